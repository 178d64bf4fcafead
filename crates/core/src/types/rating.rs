//! Five-star rating input.

/// State of a five-star rating widget.
///
/// Selecting star `n` selects every star up to `n`. Selecting the highest
/// selected star again clears the rating. Hovering previews a rating without
/// touching the selection.
///
/// ```
/// use laundry_core::StarRating;
///
/// let mut rating = StarRating::default();
/// rating.click(4);
/// assert_eq!(rating.value(), 4);
/// rating.click(4);
/// assert_eq!(rating.value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarRating {
    selected: u8,
    hovered: u8,
}

impl StarRating {
    pub const MAX: u8 = 5;

    /// Click star `star` (1-based). Out-of-range stars are ignored.
    pub const fn click(&mut self, star: u8) {
        if star == 0 || star > Self::MAX {
            return;
        }
        self.selected = if self.selected == star { 0 } else { star };
    }

    /// Hover over star `star`; `0` ends the hover.
    pub const fn hover(&mut self, star: u8) {
        self.hovered = if star > Self::MAX { Self::MAX } else { star };
    }

    /// The committed rating, `0` when nothing is selected.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.selected
    }

    /// Whether star `star` is drawn filled, taking the hover preview into account.
    #[must_use]
    pub const fn is_lit(&self, star: u8) -> bool {
        if self.hovered > 0 {
            star <= self.hovered
        } else {
            star <= self.selected
        }
    }

    /// Caption shown under the stars.
    #[must_use]
    pub fn label(&self) -> String {
        match self.selected {
            0 => "Click to rate".to_owned(),
            1 => "You rated 1 star".to_owned(),
            n => format!("You rated {n} stars"),
        }
    }

    /// A rating can only be submitted once at least one star is selected.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.selected > 0
    }

    /// Text rendering of the five stars, e.g. `★★★☆☆`.
    #[must_use]
    pub fn stars(&self) -> String {
        (1..=Self::MAX)
            .map(|star| if self.is_lit(star) { '★' } else { '☆' })
            .collect()
    }

    pub const fn reset(&mut self) {
        self.selected = 0;
        self.hovered = 0;
    }
}
