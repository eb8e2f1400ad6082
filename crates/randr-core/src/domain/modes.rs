//! Resolution and refresh-rate choice lists offered for mirror / extend.

use super::monitor::Monitor;

/// Preferred resolution when the catalogue offers it, and the fallback when it is empty.
pub const DEFAULT_MODE: &str = "1920x1080";

/// Refresh rates offered for mirror / extend, in display order.
pub const RATE_CHOICES: [&str; 4] = ["30.00", "50.00", "59.94", "60.00"];

/// Rate selected by default.
pub const DEFAULT_RATE: &str = "60.00";

/// Union of every monitor's modes, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeCatalogue {
    modes: Vec<String>,
}

impl ModeCatalogue {
    /// Collects the distinct modes of all `monitors`, sorted by pixel area
    /// descending.  Equal areas are ordered by width descending, then lexically,
    /// so the list is stable across refreshes.
    pub fn from_monitors(monitors: &[Monitor]) -> Self {
        let mut modes: Vec<String> = Vec::new();
        for mode in monitors.iter().flat_map(|m| m.modes.iter()) {
            if !modes.contains(mode) {
                modes.push(mode.clone());
            }
        }
        modes.sort_by(|a, b| {
            let (aw, ah) = dimensions(a);
            let (bw, bh) = dimensions(b);
            area(bw, bh)
                .cmp(&area(aw, ah))
                .then(bw.cmp(&aw))
                .then_with(|| a.cmp(b))
        });
        Self { modes }
    }

    /// All modes, largest first.
    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    /// Returns `true` if no monitor reported any mode.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Returns `true` if `mode` is one of the catalogue entries.
    pub fn contains(&self, mode: &str) -> bool {
        self.modes.iter().any(|m| m == mode)
    }

    /// The initially selected mode: [`DEFAULT_MODE`] when offered, else the
    /// largest mode, else [`DEFAULT_MODE`].
    pub fn default_mode(&self) -> &str {
        if self.contains(DEFAULT_MODE) {
            DEFAULT_MODE
        } else {
            self.modes.first().map(String::as_str).unwrap_or(DEFAULT_MODE)
        }
    }
}

/// Returns `true` if `rate` is one of [`RATE_CHOICES`].
pub fn is_rate_choice(rate: &str) -> bool {
    RATE_CHOICES.contains(&rate)
}

/// Splits `WxH` into `(W, H)`; malformed input counts as zero area.
/// Pixel count, widened so no parsed `WxH` pair can overflow.
fn area(width: u64, height: u64) -> u128 {
    u128::from(width) * u128::from(height)
}

fn dimensions(mode: &str) -> (u64, u64) {
    let mut parts = mode.splitn(2, 'x');
    let w = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let h = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_modes(name: &str, modes: &[&str]) -> Monitor {
        let mut m = Monitor::new(name, 1920, 1080, 0, 0);
        for mode in modes {
            m.push_mode(mode);
        }
        m
    }

    #[test]
    fn test_catalogue_merges_and_sorts_by_area_descending() {
        let monitors = vec![
            with_modes("A", &["1920x1080", "1280x720"]),
            with_modes("B", &["2560x1440", "1920x1080", "800x600"]),
        ];
        let cat = ModeCatalogue::from_monitors(&monitors);
        assert_eq!(cat.modes(), ["2560x1440", "1920x1080", "1280x720", "800x600"]);
    }

    #[test]
    fn test_equal_area_breaks_ties_by_width() {
        let cat = ModeCatalogue::from_monitors(&[with_modes("A", &["1080x1920", "1920x1080"])]);
        assert_eq!(cat.modes(), ["1920x1080", "1080x1920"]);
    }

    #[test]
    fn test_default_mode_prefers_1920x1080_when_offered() {
        let cat = ModeCatalogue::from_monitors(&[with_modes("A", &["3840x2160", "1920x1080"])]);
        assert_eq!(cat.default_mode(), "1920x1080");
    }

    #[test]
    fn test_default_mode_falls_back_to_largest() {
        let cat = ModeCatalogue::from_monitors(&[with_modes("A", &["1280x720", "2560x1440"])]);
        assert_eq!(cat.default_mode(), "2560x1440");
    }

    #[test]
    fn test_default_mode_of_empty_catalogue() {
        let cat = ModeCatalogue::default();
        assert!(cat.is_empty());
        assert_eq!(cat.default_mode(), DEFAULT_MODE);
    }

    #[test]
    fn test_oversized_modes_sort_without_overflow() {
        let cat = ModeCatalogue::from_monitors(&[with_modes(
            "A",
            &["1920x1080", "99999999999x99999999999", "18446744073709551615x2"],
        )]);
        assert_eq!(
            cat.modes(),
            ["99999999999x99999999999", "18446744073709551615x2", "1920x1080"]
        );
    }

    #[test]
    fn test_rate_choices_include_default_rate() {
        assert!(is_rate_choice(DEFAULT_RATE));
        assert!(!is_rate_choice("75.00"));
    }
}
