// Display mode state machine: text terminal vs. mounted cartridge

/// A mountable media reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Terminal,
    Cartridge {
        media: MediaRef,
    },
}

/// Result of a mount or eject request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Mounted(MediaRef),
    /// Mount while already in Cartridge; carries the media still mounted
    AlreadyMounted(MediaRef),
    Ejected(MediaRef),
    /// Eject while already in Terminal
    NotMounted,
}

#[derive(Debug, Default)]
pub struct ModeState {
    mode: Mode,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_cartridge(&self) -> bool {
        matches!(self.mode, Mode::Cartridge { .. })
    }

    pub fn media(&self) -> Option<&MediaRef> {
        match &self.mode {
            Mode::Cartridge { media } => Some(media),
            Mode::Terminal => None,
        }
    }

    /// Submitted lines are only evaluated in Terminal mode
    pub fn accepts_commands(&self) -> bool {
        !self.is_cartridge()
    }

    /// The cancel key is swallowed only while a cartridge is mounted
    pub fn intercepts_cancel_key(&self) -> bool {
        self.is_cartridge()
    }

    pub fn mount(&mut self, media: MediaRef) -> Transition {
        match &self.mode {
            Mode::Cartridge { media: current } => Transition::AlreadyMounted(current.clone()),
            Mode::Terminal => {
                self.mode = Mode::Cartridge {
                    media: media.clone(),
                };
                Transition::Mounted(media)
            }
        }
    }

    pub fn eject(&mut self) -> Transition {
        match std::mem::take(&mut self.mode) {
            Mode::Cartridge { media } => Transition::Ejected(media),
            Mode::Terminal => Transition::NotMounted,
        }
    }
}
