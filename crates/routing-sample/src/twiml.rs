//! Minimal voice response markup for the call webhook

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    /// Hold the call silently for `length` seconds
    Pause { length: u32 },
}

/// An XML voice response, built verb by verb
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(mut self, length: u32) -> Self {
        self.verbs.push(Verb::Pause { length });
        self
    }
}

impl fmt::Display for VoiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        write!(f, "<Response>")?;
        for verb in &self.verbs {
            match verb {
                Verb::Pause { length } => write!(f, "<Pause length=\"{}\"></Pause>", length)?,
            }
        }
        write!(f, "</Response>")
    }
}
