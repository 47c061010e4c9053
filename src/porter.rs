//! Porter stemmer with the NLTK extensions.
//!
//! The 1980 Porter rules plus what NLTK's `PorterStemmer` applies in its
//! default mode: a table of irregular forms, words of two letters or fewer
//! left alone, and the extra rules in steps 1a, 1b, 1c and 2. Vocabularies
//! built from NLTK-stemmed corpora only match this exact variant.

const IRREGULAR: &[(&str, &str)] = &[
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

type Condition<'a> = &'a dyn Fn(&[char]) -> bool;

fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant transitions, `m` in `[C](VC)^m[V]`.
fn measure(stem: &[char]) -> usize {
    let consonants: Vec<bool> = (0..stem.len()).map(|i| is_consonant(stem, i)).collect();
    consonants.windows(2).filter(|w| !w[0] && w[1]).count()
}

fn contains_vowel(stem: &[char]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    (n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], 'w' | 'x' | 'y'))
        || (n == 2 && !is_consonant(word, 0) && is_consonant(word, 1))
}

fn ends(word: &[char], suffix: &str) -> bool {
    let n = suffix.chars().count();
    word.len() >= n && word[word.len() - n..].iter().copied().eq(suffix.chars())
}

/// Drops the last `n` characters and appends `tail`.
fn replace(mut word: Vec<char>, n: usize, tail: &str) -> Vec<char> {
    word.truncate(word.len() - n);
    word.extend(tail.chars());
    word
}

fn always(_: &[char]) -> bool {
    true
}

fn positive(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

/// The first rule whose suffix matches decides; a failed condition stops
/// the search.
fn apply_rules(word: Vec<char>, rules: &[(&str, &str, Condition<'_>)]) -> Vec<char> {
    for &(suffix, replacement, condition) in rules {
        if ends(&word, suffix) {
            let n = suffix.chars().count();
            let holds = condition(&word[..word.len() - n]);
            return if holds {
                replace(word, n, replacement)
            } else {
                word
            };
        }
    }
    word
}

fn step1a(word: Vec<char>) -> Vec<char> {
    if word.len() == 4 && ends(&word, "ies") {
        return replace(word, 3, "ie");
    }
    let rules: [(&str, &str, Condition<'_>); 4] = [
        ("sses", "ss", &always),
        ("ies", "i", &always),
        ("ss", "ss", &always),
        ("s", "", &always),
    ];
    apply_rules(word, &rules)
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if ends(&word, "ied") {
        let tail = if word.len() == 4 { "ie" } else { "i" };
        return replace(word, 3, tail);
    }

    if ends(&word, "eed") {
        let holds = measure(&word[..word.len() - 3]) > 0;
        return if holds { replace(word, 3, "ee") } else { word };
    }

    let Some(stem_len) = ["ed", "ing"].iter().find_map(|suffix| {
        let stem_len = word.len().checked_sub(suffix.len())?;
        (ends(&word, suffix) && contains_vowel(&word[..stem_len])).then_some(stem_len)
    }) else {
        return word;
    };

    let mut stem = word;
    stem.truncate(stem_len);

    if ends(&stem, "at") || ends(&stem, "bl") || ends(&stem, "iz") {
        stem.push('e');
    } else if ends_double_consonant(&stem) {
        if !matches!(stem.last(), Some('l' | 's' | 'z')) {
            stem.pop();
        }
    } else if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push('e');
    }

    stem
}

fn step1c(mut word: Vec<char>) -> Vec<char> {
    if ends(&word, "y") {
        let n = word.len() - 1;
        if n > 1 && is_consonant(&word, n - 1) {
            word[n] = 'i';
        }
    }
    word
}

fn step2(word: Vec<char>) -> Vec<char> {
    if ends(&word, "alli") && positive(&word[..word.len() - 4]) {
        return step2(replace(word, 4, "al"));
    }

    // the "l" of "logi" stays with the stem when measuring
    let logi_holds = positive(&word[..word.len().saturating_sub(3)]);
    let logi = move |_: &[char]| logi_holds;

    let rules: [(&str, &str, Condition<'_>); 22] = [
        ("ational", "ate", &positive),
        ("tional", "tion", &positive),
        ("enci", "ence", &positive),
        ("anci", "ance", &positive),
        ("izer", "ize", &positive),
        ("bli", "ble", &positive),
        ("alli", "al", &positive),
        ("entli", "ent", &positive),
        ("eli", "e", &positive),
        ("ousli", "ous", &positive),
        ("ization", "ize", &positive),
        ("ation", "ate", &positive),
        ("ator", "ate", &positive),
        ("alism", "al", &positive),
        ("iveness", "ive", &positive),
        ("fulness", "ful", &positive),
        ("ousness", "ous", &positive),
        ("aliti", "al", &positive),
        ("iviti", "ive", &positive),
        ("biliti", "ble", &positive),
        ("fulli", "ful", &positive),
        ("logi", "log", &logi),
    ];
    apply_rules(word, &rules)
}

fn step3(word: Vec<char>) -> Vec<char> {
    let rules: [(&str, &str, Condition<'_>); 7] = [
        ("icate", "ic", &positive),
        ("ative", "", &positive),
        ("alize", "al", &positive),
        ("iciti", "ic", &positive),
        ("ical", "ic", &positive),
        ("ful", "", &positive),
        ("ness", "", &positive),
    ];
    apply_rules(word, &rules)
}

fn step4(word: Vec<char>) -> Vec<char> {
    let ion = |stem: &[char]| above_one(stem) && matches!(stem.last(), Some('s' | 't'));

    let rules: [(&str, &str, Condition<'_>); 19] = [
        ("al", "", &above_one),
        ("ance", "", &above_one),
        ("ence", "", &above_one),
        ("er", "", &above_one),
        ("ic", "", &above_one),
        ("able", "", &above_one),
        ("ible", "", &above_one),
        ("ant", "", &above_one),
        ("ement", "", &above_one),
        ("ment", "", &above_one),
        ("ent", "", &above_one),
        ("ion", "", &ion),
        ("ou", "", &above_one),
        ("ism", "", &above_one),
        ("ate", "", &above_one),
        ("iti", "", &above_one),
        ("ous", "", &above_one),
        ("ive", "", &above_one),
        ("ize", "", &above_one),
    ];
    apply_rules(word, &rules)
}

fn step5a(mut word: Vec<char>) -> Vec<char> {
    if ends(&word, "e") {
        let stem = &word[..word.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            word.pop();
        }
    }
    word
}

fn step5b(mut word: Vec<char>) -> Vec<char> {
    if ends(&word, "ll") && above_one(&word[..word.len() - 1]) {
        word.pop();
    }
    word
}

pub fn stem(word: &str) -> String {
    let word = word.to_lowercase();

    if let Some(&(_, base)) = IRREGULAR.iter().find(|&&(form, _)| form == word) {
        return base.to_string();
    }

    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 2 {
        return word;
    }

    let chars = step1a(chars);
    let chars = step1b(chars);
    let chars = step1c(chars);
    let chars = step2(chars);
    let chars = step3(chars);
    let chars = step4(chars);
    let chars = step5a(chars);
    let chars = step5b(chars);

    chars.into_iter().collect()
}
