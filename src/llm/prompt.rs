//! Persona prompt for turning source material into a two-host script.

use crate::config::Config;

/// Build the dialogue-writing prompt around `content`.
///
/// Host names, personalities, section lengths and speech cues all come
/// from `config`, so the script matches the voices the synthesizer uses.
pub fn build_prompt(config: &Config, content: &str) -> String {
    let host = &config.speakers.host_name;
    let guest = &config.speakers.guest_name;
    let host_personality = &config.speakers.host_personality;
    let guest_personality = &config.speakers.guest_personality;
    let conv = &config.conversation;
    let speech = &config.speech;
    let pause = &speech.pause_marker;
    let excitement = &speech.excitement_marker;
    let question = &speech.question_marker;
    let thinking = &speech.thinking_sound;
    let agreement = &speech.agreement_sound;
    let laughter = &speech.laughter_sound;

    format!(
        "Write a natural, energetic podcast conversation between two hosts about the material below.

HOSTS:
{host}: {host_personality}
{guest}: {guest_personality}

STRUCTURE:
Opening banter ({opening_min}-{opening_max} words)
- Lively greeting
- A quick personal aside
- An excited turn to today's topic

Main discussion ({main_min}-{main_max} words)
- Back-and-forth exploration of the key points
- Both hosts building on each other's ideas
- Excited interruptions that add detail
- Quick pace, clear delivery
- Playful moments throughout

SPEECH CUES:
- \"{pause}\" for a pause
- \"{excitement}\" for excitement
- \"{question}\" for questions and surprise
- \"{thinking}\" while thinking
- \"{agreement}\" for agreement
- \"{laughter}\" for laughter

EXAMPLE:
{host}: Oh, you are going to love this one{excitement}
{guest}: Wait, is this the thing you mentioned last week{question}
{host}: It is{excitement} {thinking}{pause} and it gets even better.
{guest}: {agreement}, okay, tell me everything{excitement}

FORMAT RULES:
- Every line starts with \"{host}: \" or \"{guest}: \"
- Plain text only, no markup or special characters
- Write sounds out phonetically
- No stage directions, headings or narration

MATERIAL:
{content}

Reply with the conversation only.",
        opening_min = conv.opening_words_min,
        opening_max = conv.opening_words_max,
        main_min = conv.main_discussion_min,
        main_max = conv.main_discussion_max,
        content = content.trim(),
    )
}

/// Strip markdown residue from a model reply.
///
/// Removes `*`, `#` and backticks, then drops blank lines.
pub fn clean_response(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| line.replace(['*', '#', '`'], ""))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
