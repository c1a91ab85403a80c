/// Previous index, wrapping to the last item
pub fn prev(idx: Option<usize>, all: usize) -> Option<usize> {
    if let Some(idx) = idx {
        idx.checked_sub(1).or_else(|| all.checked_sub(1))
    } else {
        all.checked_sub(1)
    }
}

/// Next index, wrapping to the first item
pub fn next(idx: Option<usize>, all: usize) -> Option<usize> {
    if let Some(idx) = idx {
        let next = idx + 1;
        if next < all {
            Some(next)
        } else {
            (all > 0).then_some(0)
        }
    } else {
        (all > 0).then_some(0)
    }
}

/// select previous item, stepping past the first one returns focus to the input
pub fn prev_opt(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        Some(0) => None,
        Some(idx) => Some(idx.min(all).saturating_sub(1)).filter(|_| all > 0),
        None => all.checked_sub(1),
    }
}

/// select next item, stepping past the last one returns focus to the input
pub fn next_opt(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        Some(idx) => Some(idx + 1).filter(|next| *next < all),
        None => (all > 0).then_some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_moves() {
        assert_eq!(next(Some(2), 3), Some(0));
        assert_eq!(prev(Some(0), 3), Some(2));
        assert_eq!(next(None, 3), Some(0));
        assert_eq!(prev(None, 3), Some(2));
        assert_eq!(next(None, 0), None);
        assert_eq!(prev(Some(0), 0), None);
    }

    #[test]
    fn optional_moves_pass_through_the_input() {
        assert_eq!(next_opt(None, 2), Some(0));
        assert_eq!(next_opt(Some(1), 2), None);
        assert_eq!(prev_opt(Some(0), 2), None);
        assert_eq!(prev_opt(None, 2), Some(1));
        // list shrank under the cursor
        assert_eq!(prev_opt(Some(5), 2), Some(1));
        assert_eq!(prev_opt(Some(5), 0), None);
    }
}
