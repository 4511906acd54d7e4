/// First `max_chars` characters of `text`, never splitting a code point.
pub fn preview(text: &str, max_chars: u32) -> String {
	text.chars().take(max_chars as usize).collect()
}
