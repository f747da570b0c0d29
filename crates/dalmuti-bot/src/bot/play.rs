use super::PlanError;
use dalmuti_core::model::card::CardValue;
use dalmuti_core::model::play::resolve_value;

/// Chooses cards to play strictly under `ceiling`.
///
/// `required == 0` is a free lead and must come with
/// [`CardValue::FREE_LEAD_CEILING`]. Values are tried from 12 down to 1,
/// first without Jesters, then with one, then with two. An empty result is a
/// pass.
pub fn pick_cards(
    cards: &[CardValue],
    required: usize,
    ceiling: u8,
) -> Result<Vec<CardValue>, PlanError> {
    let leading = required == 0;
    if leading != (ceiling == CardValue::FREE_LEAD_CEILING) {
        return Err(PlanError::MismatchedContext { required, ceiling });
    }

    let jesters = cards.iter().filter(|c| c.is_jester()).count();
    for jesters_used in 0..=jesters {
        for value in CardValue::ordinary_descending() {
            if value.value() >= ceiling {
                continue;
            }
            let available = cards.iter().filter(|&&c| c == value).count();
            if available == 0 {
                continue;
            }

            if leading {
                let mut play = vec![value; available];
                let others = cards.len() - available;
                if others > 0 && others == jesters {
                    play.extend(std::iter::repeat_n(CardValue::JESTER, jesters));
                }
                return Ok(play);
            }

            if available + jesters_used < required {
                continue;
            }
            let mut play = vec![value; required - jesters_used];
            play.extend(std::iter::repeat_n(CardValue::JESTER, jesters_used));
            return Ok(play);
        }
    }

    if leading && !cards.is_empty() && cards.iter().all(|c| c.is_jester()) {
        return Ok(cards.to_vec());
    }
    Ok(Vec::new())
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Picks a move against the last non-pass play, or leads when there is none.
    pub fn choose(
        hand: &[CardValue],
        table: Option<&[CardValue]>,
    ) -> Result<Vec<CardValue>, PlanError> {
        match table.filter(|cards| !cards.is_empty()) {
            None => pick_cards(hand, 0, CardValue::FREE_LEAD_CEILING),
            Some(cards) => {
                let resolved = resolve_value(cards).map_err(PlanError::UnreadableTable)?;
                pick_cards(hand, cards.len(), resolved.value.value())
            }
        }
    }
}
