pub(crate) fn clean_summary(input: &str) -> String {
    let without_tags = strip_html_with_breaks(input);
    let decoded = decode_basic_html_entities(&without_tags);
    normalize_newlines(&decoded)
}

fn strip_html_with_breaks(input: &str) -> String {
    // Strips tags while converting <br> (and <br/>, <br />) into newlines.
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }
        let mut tag = String::new();
        for c in chars.by_ref() {
            if c == '>' {
                break;
            }
            tag.push(c);
        }
        let tag = tag.trim().trim_start_matches('/').trim();
        if tag.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("br")) {
            out.push('\n');
        }
    }
    out
}

fn decode_basic_html_entities(input: &str) -> String {
    // Minimal entity decoding for show blurbs. Supports common named
    // entities and numeric (decimal/hex) entities.
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            out.push(ch);
            continue;
        }
        let mut entity = String::new();
        while let Some(&c) = chars.peek() {
            chars.next();
            if c == ';' {
                break;
            }
            if entity.len() > 32 {
                entity.clear();
                break;
            }
            entity.push(c);
        }
        if entity.is_empty() {
            out.push('&');
            continue;
        }
        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32)
            }
            _ if entity.starts_with('#') => {
                entity[1..].parse::<u32>().ok().and_then(char::from_u32)
            }
            _ => None,
        };
        if let Some(c) = decoded {
            out.push(c);
        } else {
            out.push('&');
            out.push_str(&entity);
            out.push(';');
        }
    }
    out
}

fn normalize_newlines(input: &str) -> String {
    let input = input.replace("\r\n", "\n");
    let mut out = String::with_capacity(input.len());
    let mut nl_run = 0usize;

    for ch in input.chars() {
        if ch == '\n' {
            nl_run += 1;
            if nl_run <= 2 {
                out.push('\n');
            }
            continue;
        }
        nl_run = 0;
        out.push(ch);
    }
    out.trim().to_string()
}
