//! Autopoiesis - new sentences grown from field hotspots.
//!
//! A hotspot becomes a prompt made of its strongest concept tags. Agent
//! deposits (tags containing `:`) never make it into a prompt.

use symbio_core::types::Hotspot;

/// Prompt from the top `top_k` tags of a hotspot, or `None` if no concept tag remains.
pub fn compose_prompt(hotspot: &Hotspot, top_k: usize) -> Option<String> {
    let tags: Vec<&str> = hotspot
        .top_tags(top_k)
        .into_iter()
        .map(|(name, _)| name.trim())
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(" "))
    }
}

/// Generate one sentence per distinct prompt, strongest hotspot first.
///
/// Stops once `max_sentences` sentences exist.
pub fn synthesize_thoughts<F>(
    hotspots: &[Hotspot],
    max_sentences: usize,
    top_k_tags: usize,
    mut generate: F,
) -> Vec<String>
where
    F: FnMut(&str) -> String,
{
    let mut ranked: Vec<&Hotspot> = hotspots.iter().collect();
    ranked.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut sentences = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for hotspot in ranked {
        if sentences.len() >= max_sentences {
            break;
        }
        let Some(prompt) = compose_prompt(hotspot, top_k_tags) else {
            continue;
        };
        if seen.contains(&prompt) {
            continue;
        }
        sentences.push(generate(&prompt).trim().to_string());
        seen.push(prompt);
    }
    sentences
}

/// Every composable prompt, in hotspot order. Duplicates are kept.
pub fn aggregate_prompts(hotspots: &[Hotspot], top_k_tags: usize) -> Vec<String> {
    hotspots
        .iter()
        .filter_map(|h| compose_prompt(h, top_k_tags))
        .collect()
}
