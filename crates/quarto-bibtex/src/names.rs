//! BibTeX name-list splitting and person-name parsing.

use crate::model::Person;

/// Split a BibTeX name list on ` and ` at brace depth zero and parse each name.
pub fn parse_name_list(value: &str) -> Vec<Person> {
    split_top_level_and(value)
        .iter()
        .map(|name| parse_person(name))
        .filter(|person| !person.last_names.is_empty() || !person.first_names.is_empty())
        .collect()
}

fn split_top_level_and(value: &str) -> Vec<String> {
    let words = split_words(value);
    let mut names = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for word in words {
        if word.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                names.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        names.push(current.join(" "));
    }
    names
}

/// Split on whitespace (and `~`) at brace depth zero.
fn split_words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && (c.is_whitespace() || c == '~') => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Split on commas at brace depth zero.
fn split_commas(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts.into_iter().map(|p| p.trim().to_string()).collect()
}

/// Whether a name word starts lowercase, which marks it as a "von" particle.
///
/// The first letter at brace depth zero decides. A word starting with a
/// brace group is only inspected when the group is a special character such
/// as `{\"u}`; other braced words count as uppercase.
fn is_von_word(word: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = word.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if depth == 0 && chars.peek() != Some(&'\\') {
                    return false;
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            '\\' => {
                // Skip the command name, the case of its argument decides.
                if let Some(&next) = chars.peek() {
                    if next.is_ascii_alphabetic() {
                        while chars.peek().is_some_and(|n| n.is_ascii_alphabetic()) {
                            chars.next();
                        }
                    } else {
                        chars.next();
                    }
                }
            }
            c if c.is_alphabetic() => return c.is_lowercase(),
            _ => {}
        }
    }
    false
}

pub fn parse_person(name: &str) -> Person {
    let parts = split_commas(name.trim());
    let mut person = Person::default();

    match parts.len() {
        0 => {}
        1 => {
            let words = split_words(&parts[0]);
            if words.is_empty() {
                return person;
            }
            let n = words.len();
            if n == 1 {
                person.last_names = words;
                return person;
            }
            // von part: from the first lowercase word to the last lowercase word,
            // never including the final word.
            let von_start = words[..n - 1].iter().position(|w| is_von_word(w));
            match von_start {
                Some(start) => {
                    let von_end = words[..n - 1]
                        .iter()
                        .rposition(|w| is_von_word(w))
                        .unwrap_or(start);
                    split_first(&mut person, &words[..start]);
                    person.prelast_names = words[start..=von_end].to_vec();
                    person.last_names = words[von_end + 1..].to_vec();
                }
                None => {
                    split_first(&mut person, &words[..n - 1]);
                    person.last_names = vec![words[n - 1].clone()];
                }
            }
        }
        _ => {
            let von_last = split_words(&parts[0]);
            split_von_last(&mut person, &von_last);
            if parts.len() >= 3 {
                person.lineage_names = split_words(&parts[1]);
                split_first(&mut person, &split_words(&parts[2..].join(" ")));
            } else {
                split_first(&mut person, &split_words(&parts[1]));
            }
        }
    }
    person
}

fn split_first(person: &mut Person, words: &[String]) {
    if let Some((first, rest)) = words.split_first() {
        person.first_names = vec![first.clone()];
        person.middle_names = rest.to_vec();
    }
}

fn split_von_last(person: &mut Person, words: &[String]) {
    if words.is_empty() {
        return;
    }
    let n = words.len();
    let von_len = words[..n - 1]
        .iter()
        .take_while(|w| is_von_word(w))
        .count();
    person.prelast_names = words[..von_len].to_vec();
    person.last_names = words[von_len..].to_vec();
}
