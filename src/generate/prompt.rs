// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Utterance;

/// Frames the utterance text with its speaker and timing.
pub fn derive_prompt(utterance: &Utterance) -> String {
    let speaker = utterance
        .user
        .as_deref()
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .unwrap_or("unknown speaker");
    format!(
        "{speaker} ({:.1}s-{:.1}s): {}",
        utterance.start,
        utterance.end,
        utterance.content.trim()
    )
}

/// Whether an utterance carries enough words to be worth a generation.
pub fn qualifies(utterance: &Utterance, min_words: usize) -> bool {
    let words = utterance.word_count();
    words > 0 && words >= min_words
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{derive_prompt, qualifies};
    use crate::model::Utterance;

    fn utterance(user: Option<&str>, content: &str) -> Utterance {
        Utterance {
            call_id: "c".into(),
            user: user.map(str::to_owned),
            content: content.into(),
            start: 1.5,
            end: 4.0,
            duration: 2.5,
            emitted_at: 9,
        }
    }

    #[test]
    fn prompt_names_speaker_and_timing() {
        assert_eq!(
            derive_prompt(&utterance(Some("Ana"), "  we can ship it ")),
            "Ana (1.5s-4.0s): we can ship it"
        );
        assert!(derive_prompt(&utterance(None, "x")).starts_with("unknown speaker"));
    }

    #[rstest]
    #[case("", 0, false)]
    #[case("ok", 3, false)]
    #[case("we can ship", 3, true)]
    #[case("   ", 1, false)]
    #[case("hello", 0, true)]
    fn qualification_counts_words(#[case] content: &str, #[case] min: usize, #[case] expected: bool) {
        assert_eq!(qualifies(&utterance(None, content), min), expected);
    }
}
