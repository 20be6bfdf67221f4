//! Display label truncation.

use unicode_segmentation::UnicodeSegmentation;

/// Longest label drawn on the canvas before truncation.
pub const DEFAULT_MAX_LABEL_LEN: usize = 20;

/// Appended to truncated labels. Counts as one extra character.
pub const ELLIPSIS: char = '…';

/// Shortens `label` to `max_len` user-visible characters plus [`ELLIPSIS`].
///
/// Lengths are counted in extended grapheme clusters, so combining marks,
/// emoji ZWJ sequences and flags are never split or over-counted. Labels that
/// already fit are returned unchanged.
pub fn format_label(label: &str, max_len: usize) -> String {
	let Some((cut, _)) = label.grapheme_indices(true).nth(max_len) else {
		return label.to_string();
	};
	let mut short = String::with_capacity(cut + ELLIPSIS.len_utf8());
	short.push_str(&label[..cut]);
	short.push(ELLIPSIS);
	short
}

#[cfg(test)]
mod tests {
	use super::*;

	fn visible_len(s: &str) -> usize {
		s.graphemes(true).count()
	}

	#[test]
	fn short_labels_are_untouched() {
		assert_eq!(format_label("Nmap", DEFAULT_MAX_LABEL_LEN), "Nmap");
		assert_eq!(format_label("", DEFAULT_MAX_LABEL_LEN), "");
		let exact = "a".repeat(DEFAULT_MAX_LABEL_LEN);
		assert_eq!(format_label(&exact, DEFAULT_MAX_LABEL_LEN), exact);
	}

	#[test]
	fn long_label_keeps_twenty_chars() {
		let label = "A Very Long Technique Title Exceeding Twenty Chars";
		let short = format_label(label, DEFAULT_MAX_LABEL_LEN);
		assert_eq!(short, "A Very Long Techniqu…");
		assert_eq!(visible_len(&short), DEFAULT_MAX_LABEL_LEN + 1);
	}

	#[test]
	fn multibyte_characters_stay_whole() {
		let label = "漢字テスト漢字テスト漢字テスト漢字テスト漢字";
		let short = format_label(label, DEFAULT_MAX_LABEL_LEN);
		assert_eq!(visible_len(&short), 21);
		assert!(short.starts_with("漢字テスト"));
		assert!(short.ends_with(ELLIPSIS));

		let emoji = "🔥".repeat(25);
		assert_eq!(format_label(&emoji, 3), "🔥🔥🔥…");
	}

	#[test]
	fn combining_marks_count_once() {
		// 15 visible characters, 30 code points
		let accented = "e\u{301}".repeat(15);
		assert_eq!(format_label(&accented, DEFAULT_MAX_LABEL_LEN), accented);

		let long = "e\u{301}".repeat(25);
		let short = format_label(&long, DEFAULT_MAX_LABEL_LEN);
		assert_eq!(short, format!("{}…", "e\u{301}".repeat(20)));
	}

	#[test]
	fn zwj_sequences_stay_whole() {
		let family = "👨\u{200d}👩\u{200d}👧";
		let fits = format!("{}{}", "x".repeat(19), family);
		assert_eq!(format_label(&fits, DEFAULT_MAX_LABEL_LEN), fits);

		let over = format!("{}{}yy", "x".repeat(19), family);
		assert_eq!(format_label(&over, DEFAULT_MAX_LABEL_LEN), format!("{fits}…"));

		let flags = "🇫🇷🇩🇪🇯🇵";
		assert_eq!(format_label(flags, 2), "🇫🇷🇩🇪…");
	}

	#[test]
	fn length_bound_holds() {
		for unit in ["x", "e\u{301}", "👨\u{200d}👩\u{200d}👧"] {
			for len in 0..30 {
				let label = unit.repeat(len);
				for max in [0, 1, 5, 20] {
					let out = format_label(&label, max);
					assert!(visible_len(&out) <= max + 1);
					if len <= max {
						assert_eq!(out, label);
					}
				}
			}
		}
	}
}
