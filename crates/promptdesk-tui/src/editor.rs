//! Cursor movement and editing over the prompt buffer.
//!
//! The cursor is a byte offset into the buffer and always sits on a char
//! boundary. Vertical movement keeps the column counted in chars.

/// Snap `cursor` into `text` and onto a char boundary.
pub(crate) fn clamp(text: &str, cursor: &mut usize) {
    if *cursor > text.len() {
        *cursor = text.len();
    }
    while !text.is_char_boundary(*cursor) {
        *cursor -= 1;
    }
}

pub(crate) fn insert(text: &mut String, cursor: &mut usize, c: char) {
    text.insert(*cursor, c);
    *cursor += c.len_utf8();
}

pub(crate) fn backspace(text: &mut String, cursor: &mut usize) {
    if let Some(prev) = prev_boundary(text, *cursor) {
        text.remove(prev);
        *cursor = prev;
    }
}

pub(crate) fn delete(text: &mut String, cursor: &mut usize) {
    if *cursor < text.len() {
        text.remove(*cursor);
    }
}

pub(crate) fn left(text: &str, cursor: &mut usize) {
    if let Some(prev) = prev_boundary(text, *cursor) {
        *cursor = prev;
    }
}

pub(crate) fn right(text: &str, cursor: &mut usize) {
    if let Some(c) = text.get(*cursor..).and_then(|rest| rest.chars().next()) {
        *cursor += c.len_utf8();
    }
}

pub(crate) fn home(text: &str, cursor: &mut usize) {
    *cursor = line_start(text, *cursor);
}

pub(crate) fn end(text: &str, cursor: &mut usize) {
    *cursor = line_end(text, *cursor);
}

pub(crate) fn up(text: &str, cursor: &mut usize) {
    let start = line_start(text, *cursor);
    if start == 0 {
        *cursor = 0;
        return;
    }
    let col = column(text, *cursor);
    let prev_start = line_start(text, start - 1);
    *cursor = advance(text, prev_start, col);
}

pub(crate) fn down(text: &str, cursor: &mut usize) {
    let end = line_end(text, *cursor);
    if end == text.len() {
        *cursor = end;
        return;
    }
    let col = column(text, *cursor);
    *cursor = advance(text, end + 1, col);
}

/// Zero-based (row, column-in-chars) of the cursor.
pub(crate) fn position(text: &str, cursor: usize) -> (usize, usize) {
    let row = text
        .get(..cursor)
        .map_or(0, |head| head.matches('\n').count());
    (row, column(text, cursor))
}

/// Text between the start of the cursor's line and the cursor.
pub(crate) fn line_prefix(text: &str, cursor: usize) -> &str {
    text.get(line_start(text, cursor)..cursor).unwrap_or("")
}

fn prev_boundary(text: &str, cursor: usize) -> Option<usize> {
    text.get(..cursor)
        .and_then(|head| head.char_indices().next_back())
        .map(|(i, _)| i)
}

fn line_start(text: &str, cursor: usize) -> usize {
    text.get(..cursor)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |i| i + 1)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text.get(cursor..)
        .and_then(|rest| rest.find('\n'))
        .map_or(text.len(), |i| cursor + i)
}

fn column(text: &str, cursor: usize) -> usize {
    line_prefix(text, cursor).chars().count()
}

/// Move up to `col` chars right from `start`, stopping at the line end.
fn advance(text: &str, start: usize, col: usize) -> usize {
    let end = line_end(text, start);
    text.get(start..end)
        .and_then(|line| line.char_indices().nth(col))
        .map_or(end, |(i, _)| start + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> (String, usize) {
        (text.to_string(), text.len())
    }

    #[test]
    fn insert_and_backspace_multibyte() {
        let (mut text, mut cursor) = buffer("提示");
        insert(&mut text, &mut cursor, '词');
        assert_eq!(text, "提示词");
        assert_eq!(cursor, text.len());

        backspace(&mut text, &mut cursor);
        backspace(&mut text, &mut cursor);
        assert_eq!(text, "提");
        assert_eq!(cursor, "提".len());
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let (mut text, mut cursor) = (String::from("ab"), 0);
        backspace(&mut text, &mut cursor);
        assert_eq!(text, "ab");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let (mut text, mut cursor) = (String::from("a助b"), 1);
        delete(&mut text, &mut cursor);
        assert_eq!(text, "ab");
        delete(&mut text, &mut 2);
        assert_eq!(text, "ab");
    }

    #[test]
    fn left_right_step_over_chars() {
        let text = "a提b";
        let mut cursor = 0;
        right(text, &mut cursor);
        right(text, &mut cursor);
        assert_eq!(cursor, 1 + "提".len());
        left(text, &mut cursor);
        assert_eq!(cursor, 1);
        right(text, &mut cursor);
        right(text, &mut cursor);
        right(text, &mut cursor);
        assert_eq!(cursor, text.len());
    }

    #[test]
    fn home_end_stay_on_line() {
        let text = "first\nsecond\nthird";
        let mut cursor = text.find("cond").unwrap();
        home(text, &mut cursor);
        assert_eq!(cursor, 6);
        end(text, &mut cursor);
        assert_eq!(cursor, 12);
    }

    #[test]
    fn up_down_keep_column() {
        let text = "abcdef\nxy\nlonger line";
        let mut cursor = 5; // after "abcde"
        down(text, &mut cursor);
        assert_eq!(position(text, cursor), (1, 2)); // clamped to "xy" end
        down(text, &mut cursor);
        assert_eq!(position(text, cursor), (2, 2));
        up(text, &mut cursor);
        up(text, &mut cursor);
        assert_eq!(position(text, cursor), (0, 2));
        up(text, &mut cursor);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn down_on_last_line_goes_to_end() {
        let text = "one\ntwo";
        let mut cursor = 4;
        down(text, &mut cursor);
        assert_eq!(cursor, text.len());
    }

    #[test]
    fn clamp_fixes_out_of_range_and_mid_char() {
        let text = "提示";
        let mut cursor = 100;
        clamp(text, &mut cursor);
        assert_eq!(cursor, text.len());
        let mut cursor = 1;
        clamp(text, &mut cursor);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn position_counts_rows_and_chars() {
        let text = "你好\n世界!";
        assert_eq!(position(text, text.len()), (1, 3));
        assert_eq!(line_prefix(text, text.len()), "世界!");
    }
}
