use crate::model::card::CardValue;
use core::fmt;

/// Comparable strength of a non-empty play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: CardValue,
    pub jesters: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// An empty play has no value.
    Unresolvable,
    /// More than two distinct values; never valid, even as a table reference.
    MalformedPlay { distinct: usize },
    TooManyValues { distinct: usize },
    MixedWithoutJester,
    CountMismatch { expected: usize, actual: usize },
    DoesNotBeat { value: CardValue, to_beat: CardValue },
}

impl PlayError {
    /// Errors that can only come from corrupted engine state.
    pub const fn is_internal(&self) -> bool {
        matches!(self, PlayError::Unresolvable | PlayError::MalformedPlay { .. })
    }
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::Unresolvable => write!(f, "cannot resolve the value of an empty play"),
            PlayError::MalformedPlay { distinct } => {
                write!(f, "play mixes {distinct} distinct values")
            }
            PlayError::TooManyValues { distinct } => {
                write!(f, "a play may hold at most two distinct values, got {distinct}")
            }
            PlayError::MixedWithoutJester => {
                write!(f, "two distinct values are only allowed with a jester")
            }
            PlayError::CountMismatch { expected, actual } => {
                write!(f, "expected {expected} cards but got {actual}")
            }
            PlayError::DoesNotBeat { value, to_beat } => {
                write!(f, "{value} does not beat {to_beat}")
            }
        }
    }
}

impl std::error::Error for PlayError {}

fn distinct_values(cards: &[CardValue]) -> Vec<CardValue> {
    let mut distinct = cards.to_vec();
    distinct.sort();
    distinct.dedup();
    distinct
}

pub fn resolve_value(cards: &[CardValue]) -> Result<ResolvedValue, PlayError> {
    let distinct = distinct_values(cards);
    match distinct.as_slice() {
        [] => Err(PlayError::Unresolvable),
        // All-jester plays count the jesters as plain 13s.
        [value] => Ok(ResolvedValue {
            value: *value,
            jesters: 0,
        }),
        [value, jester] if jester.is_jester() => Ok(ResolvedValue {
            value: *value,
            jesters: cards.iter().filter(|c| c.is_jester()).count(),
        }),
        _ => Err(PlayError::MalformedPlay {
            distinct: distinct.len(),
        }),
    }
}

fn check_shape(cards: &[CardValue]) -> Result<(), PlayError> {
    let distinct = distinct_values(cards);
    match distinct.len() {
        0 | 1 => Ok(()),
        2 if distinct.iter().any(|c| c.is_jester()) => Ok(()),
        2 => Err(PlayError::MixedWithoutJester),
        n => Err(PlayError::TooManyValues { distinct: n }),
    }
}

/// Checks `candidate` against the last non-pass play of the round, if any.
pub fn check_play(candidate: &[CardValue], table: Option<&[CardValue]>) -> Result<(), PlayError> {
    if candidate.is_empty() {
        return Ok(());
    }
    check_shape(candidate)?;

    let Some(table) = table.filter(|cards| !cards.is_empty()) else {
        return Ok(());
    };

    if candidate.len() != table.len() {
        return Err(PlayError::CountMismatch {
            expected: table.len(),
            actual: candidate.len(),
        });
    }

    let ours = resolve_value(candidate)?;
    let theirs = resolve_value(table)?;
    if ours.value >= theirs.value {
        return Err(PlayError::DoesNotBeat {
            value: ours.value,
            to_beat: theirs.value,
        });
    }
    Ok(())
}

pub fn is_legal_play(candidate: &[CardValue], table: Option<&[CardValue]>) -> bool {
    check_play(candidate, table).is_ok()
}
