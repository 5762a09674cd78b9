/// Build a deterministic summary prompt for audio transcripts.
pub fn build_summary_prompt(title: &str, transcript: &str) -> String {
    format!(
        "You are an assistant that writes concise, factual summaries of audio recordings.\n\
Recording: {title}\n\
\n\
Return Markdown with exactly these sections:\n\
1. ## Summary (2-5 bullets)\n\
2. ## Action Items\n\
\n\
Rules:\n\
- Use only information present in the transcript.\n\
- If a section has no content, write 'None'.\n\
- Keep each bullet short and concrete.\n\
\n\
Transcript:\n\
{transcript}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_title_and_transcript() {
        let prompt = build_summary_prompt("standup.wav", "we shipped the release");

        assert!(prompt.contains("Recording: standup.wav"));
        assert!(prompt.contains("we shipped the release"));
        assert!(prompt.contains("## Action Items"));
    }
}
