//! Instruction text for the structured generation call.

use vidsight_models::AnalysisVariant;

/// Build the fixed natural-language instruction for a variant.
///
/// The schema carried in the generation config is authoritative for the
/// output shape; the instruction tells the model what to look for.
pub fn instruction(variant: AnalysisVariant) -> String {
    let mut prompt = String::from(
        "Analyze the attached media from start to finish.\n\
         Divide it into chapters: for each chapter give the start timestamp \
         (HH:MM:SS, or MM:SS for content under an hour) and a short descriptive title.",
    );

    if variant.wants_narrative() {
        prompt.push_str(
            "\n\nAlso provide:\n\
             - A concise overall summary\n\
             - Suggested hashtags for social distribution\n\
             - A paragraph-level transcript, each paragraph with its start timestamp\n\
             - The cast of speakers, with each speaker's dialogue lines and their timestamps",
        );
    }

    if variant.wants_brands() {
        prompt.push_str(
            "\n\nDetect brand exposure: every company or product reference, \
             on screen or spoken, with the timestamp and surrounding context.",
        );
    }

    if variant.wants_evaluation() {
        prompt.push_str(
            "\n\nEvaluate the content: score each category from 0 to 10 with \
             details, then give overall positive feedback and improvement points.",
        );
    }

    prompt.push_str("\n\nReturn only data conforming to the required schema.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapters_only_instruction_is_minimal() {
        let text = instruction(AnalysisVariant::ChaptersOnly);
        assert!(text.contains("chapters"));
        assert!(!text.contains("brand exposure"));
        assert!(!text.contains("Evaluate"));
    }

    #[test]
    fn test_full_instruction_covers_all_sections() {
        let text = instruction(AnalysisVariant::Full);
        assert!(text.contains("summary"));
        assert!(text.contains("transcript"));
        assert!(text.contains("brand exposure"));
        assert!(text.contains("0 to 10"));
    }
}
