use crate::catalog::types::Item;

const FALLBACK_SUMMARY_CHARS: usize = 200;

/// Opening post of every thread.
pub fn lead_post(item: &Item, hashtag: &str) -> String {
    format!(
        "🎬 African Movie of the Day: {}\n🌍 From: {}\n{}",
        item.title, item.origin, hashtag
    )
}

pub fn thread_prompt(item: &Item, max_len: usize, hashtag: &str) -> String {
    let performers = if item.credits.is_empty() {
        "community figures or crew".to_string()
    } else {
        item.credits.join(", ")
    };

    format!(
        r#"Generate exactly 3 engaging posts (each ≤{max_len} characters) for a movie thread about '{title}' ({year}) from {origin}. Use this plot: '{plot}'. Follow this structure:
- Post 1: A concise, vibrant plot teaser capturing the movie's essence in an exciting tone.
- Post 2: Highlight key performers, community figures, or crew (e.g., director, musicians). Use provided actors: {performers}. Avoid saying 'no actor info available.'
- Post 3: A fun fact about the movie's cultural significance, filming locations, awards, or impact (include rating: {rating:.1}/10 if relevant), in an informative tone.
Each post must include the {hashtag} hashtag and be standalone, with no markdown, labels (e.g., 'Post 1'), asterisks, or extra formatting. Separate each post with a newline. Ensure Post 1 is exciting and Post 3 is informative."#,
        max_len = max_len,
        title = item.title,
        year = item.release_year,
        origin = item.origin,
        plot = item.summary,
        performers = performers,
        rating = item.rating,
        hashtag = hashtag,
    )
}

/// The three posts used when generation is unavailable.
pub fn fallback_posts(item: &Item, hashtag: &str) -> Vec<String> {
    let summary: String = item.summary.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    let featuring = if item.credits.is_empty() {
        format!("authentic voices from {}", item.origin)
    } else {
        item.credits.join(", ")
    };

    vec![
        format!("📖 '{}': {}... {}", item.title, summary, hashtag),
        format!("🌟 Featuring {}. {}", featuring, hashtag),
        format!(
            "⭐ Rated {:.1}/10. A vibrant gem from {}! {}",
            item.rating, item.origin, hashtag
        ),
    ]
}
