use crate::booking::SubType;

/// Chat chatter: words followed by one bare number (`Dear 6`, `total 150`).
///
/// Lines whose words are booking vocabulary (`A 5`, `box 12`, `abc 7`) are not
/// chatter; they go through the rule table and fail visibly if incomplete.
pub fn is_chatter(message: &str) -> bool {
    let shape = regex!(r"^([A-Za-z][A-Za-z'\s]*?)\s+\d+[.!?]*$");
    let Some(caps) = shape.captures(message) else {
        return false;
    };
    let words = &caps[1];
    !words.split_whitespace().any(is_booking_word)
}

fn is_booking_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("abc") || SubType::from_token(word).is_some()
}
