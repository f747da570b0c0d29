use core::fmt;
use serde::{Deserialize, Serialize};

pub const PLAYER_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerId {
    Person = 0,
    Bot1 = 1,
    Bot2 = 2,
    Bot3 = 3,
    Bot4 = 4,
}

impl PlayerId {
    pub const LOOP: [PlayerId; PLAYER_COUNT] = [
        PlayerId::Person,
        PlayerId::Bot1,
        PlayerId::Bot2,
        PlayerId::Bot3,
        PlayerId::Bot4,
    ];

    pub const BOTS: [PlayerId; 4] = [
        PlayerId::Bot1,
        PlayerId::Bot2,
        PlayerId::Bot3,
        PlayerId::Bot4,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerId::Person),
            1 => Some(PlayerId::Bot1),
            2 => Some(PlayerId::Bot2),
            3 => Some(PlayerId::Bot3),
            4 => Some(PlayerId::Bot4),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> PlayerId {
        match self {
            PlayerId::Person => PlayerId::Bot1,
            PlayerId::Bot1 => PlayerId::Bot2,
            PlayerId::Bot2 => PlayerId::Bot3,
            PlayerId::Bot3 => PlayerId::Bot4,
            PlayerId::Bot4 => PlayerId::Person,
        }
    }

    pub const fn is_bot(self) -> bool {
        !matches!(self, PlayerId::Person)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerId::Person => "You",
            PlayerId::Bot1 => "bot1",
            PlayerId::Bot2 => "bot2",
            PlayerId::Bot3 => "bot3",
            PlayerId::Bot4 => "bot4",
        };
        f.write_str(label)
    }
}
