//! Swedish language items: spelling, word classes, vocabulary and sorting.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_chacha::ChaCha8Rng;

use super::{OPTION_COUNT, owned, pick, pick_many};
use crate::error::GenerationError;
use crate::model::{Bucket, Item, ItemKind, Subject};
use crate::plan::{PlanTask, SvenskaTask};
use crate::profile::Profile;
use crate::shuffle::{ranked_options, shuffle_with_correct};

const HINT_SPELLING: &str =
    "Titta noga på bokstäver och ljud – sj-, tj-, hj-, lj- och dubbelteckning är vanliga fällor.";
const HINT_WORD_CLASS: &str =
    "Substantiv = namn (katt). Verb = gör/är (springer/är). Adjektiv = beskriver (röd).";
const HINT_VOCABULARY: &str =
    "Synonym ≈ liknande ord. Antonym = motsats. Testa byta ut i meningen.";
const HINT_PREPOSITION: &str =
    "Prepositioner anger läge/riktning: på, i, under, bakom, framför, vid, mellan…";

/// Distinct misspellings wanted before options are drawn.
const MIN_MISSPELLINGS: usize = 6;
const MAX_VARIANT_ATTEMPTS: usize = 40;
const SUBSTITUTE_LETTERS: &[char] = &['j', 'i', 'e', 'ä', 'å', 'o', 'u', 'h', 'k', 'g', 'y'];

/// Correct spellings with curated misspellings.
const SPELLING: &[(&str, &[&str])] = &[
    ("själv", &["skjälv", "skälv", "sjjälv"]),
    ("stjärna", &["stjarna", "stiarna", "stjerna", "sjärna"]),
    ("skjorta", &["schjorta", "skorta", "sjorta"]),
    ("känsla", &["känla", "känslla", "känslaa"]),
    ("jämföra", &["jämmföra", "gämföra"]),
    ("skoj", &["sköj", "skojj", "skoi"]),
    ("choklad", &["sjoklad", "schoklad", "chocklad"]),
    ("kyckling", &["kylcking", "kykling", "kycklig"]),
    ("järnväg", &["järnveg", "jarnväg", "jarnveg"]),
    ("hjärta", &["hjerta", "giärta", "järta"]),
    ("ljus", &["jus", "ljuss", "lius"]),
    ("tjej", &["tjejj", "chej", "tjei"]),
    ("sked", &["sched", "sjed", "skedd"]),
    ("staket", &["stakett", "stacket", "stakät"]),
    ("läkare", &["lekare", "läckare", "lägare"]),
    ("hjul", &["jiul", "hjull", "hul"]),
    ("maskin", &["maschin", "maskinn", "masjin"]),
    ("museum", &["muséum", "museeum", "museun"]),
    ("buss", &["bus", "buz", "bues"]),
    ("ficklampa", &["fiklampa", "fickllampa", "fikklampa"]),
    ("bibliotek", &["bibliotekk", "bibiliotek", "biblotek"]),
    ("skola", &["skolla", "skoola", "skolah"]),
    ("gärna", &["gjärna", "järna", "gerna"]),
    ("kemi", &["schemi", "chemi", "kämi"]),
    ("känna", &["kjänna", "tjänna", "kenna"]),
    ("genast", &["jennast", "jenast", "gennast"]),
    ("björn", &["biorn", "bjöörn", "bjönr"]),
    ("macka", &["maka", "macca", "mackka"]),
];

const NOUNS: &[&str] = &[
    "katt", "Lisa", "skola", "boll", "bord", "hund", "cykel", "fisk", "skog", "bil", "äpple",
    "pennor", "fågel", "gata", "stol",
];
const VERBS: &[&str] = &[
    "springer", "läser", "är", "äter", "sover", "ritar", "skriver", "hoppar", "simmar", "leker",
    "talar", "sjunger", "tittar", "står", "går",
];
const ADJECTIVES: &[&str] = &[
    "röd", "stor", "snabb", "glad", "ljus", "mjuk", "tyst", "lång", "varm", "blå", "smal", "hård",
    "tung", "kall", "mörk",
];
const PRONOUNS: &[&str] = &["han", "hon", "den", "det", "de", "vi", "jag", "ni"];
const PREPOSITIONS: &[&str] = &[
    "på", "i", "under", "över", "bakom", "framför", "vid", "mellan", "bredvid", "genom",
];

/// Word class name, article and word list.
const WORD_CLASSES: &[(&str, &str, &[&str])] = &[
    ("substantiv", "ett", NOUNS),
    ("verb", "ett", VERBS),
    ("adjektiv", "ett", ADJECTIVES),
    ("pronomen", "ett", PRONOUNS),
    ("preposition", "en", PREPOSITIONS),
];

/// Base word, expected answer and curated distractors.
const SYNONYMS: &[(&str, &str, &[&str])] = &[
    ("glad", "lycklig", &["ledsen", "trött", "arg"]),
    ("snabb", "kvick", &["långsam", "tyst", "mjuk"]),
    ("stor", "enorm", &["liten", "kort", "smal"]),
    ("kall", "frusen", &["varm", "ljus", "torr"]),
    ("trött", "utmattad", &["pigg", "glad", "snabb"]),
    ("rädd", "skrämd", &["modig", "lugn", "hungrig"]),
    ("arg", "ilsken", &["glad", "snäll", "lugn"]),
    ("liten", "pytteliten", &["jättestor", "lång", "bred"]),
];
const ANTONYMS: &[(&str, &str, &[&str])] = &[
    ("lång", "kort", &["snabb", "mjuk", "tyst"]),
    ("hård", "mjuk", &["tung", "lätt", "torr"]),
    ("rätt", "fel", &["sant", "klart", "snällt"]),
    ("tidig", "sen", &["långsam", "kort", "tyst"]),
    ("ljus", "mörk", &["varm", "blank", "stor"]),
    ("tyst", "högljudd", &["stilla", "mjuk", "liten"]),
    ("varm", "kall", &["het", "ljum", "torr"]),
    ("snabb", "långsam", &["kvick", "stark", "rolig"]),
];

const NAMES: &[&str] = &[
    "Lisa", "Maja", "Ali", "Noah", "Nora", "Ella", "Arvid", "Leo", "Sara", "Oskar", "Miriam",
    "Johan", "Vera", "Axel", "Sofia",
];
const PLACES: &[&str] = &[
    "parken", "skogen", "biblioteket", "matsalen", "klassrummet", "skolgården", "gympasalen",
    "fotbollsplanen", "aulan", "stranden",
];
/// Objects that take the article `en`.
const OBJECTS: &[&str] = &["boll", "bok", "cykel", "penna", "karta", "spade", "väska"];
const ACTIONS: &[&str] = &[
    "springer", "läser", "ritar", "övar", "simmar", "dansar", "sjunger", "leker", "skriver",
    "räknar",
];

/// Generates one standalone Swedish multiple-choice item.
///
/// # Errors
///
/// Returns [`GenerationError`] when a template table cannot supply enough
/// entries.
pub fn svenska_item(
    task: SvenskaTask,
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Item, GenerationError> {
    let item = match task {
        SvenskaTask::Stavning => spelling(profile, rng)?,
        SvenskaTask::Grammatik => word_class(profile, rng)?,
        SvenskaTask::Ordforstaelse => vocabulary(profile, rng)?,
        SvenskaTask::Meningar => sentence_verb(rng)?,
    };
    Ok(Item {
        area: task.area().to_owned(),
        ..item
    }
    .with_labels(Subject::Svenska.as_str(), profile.difficulty()))
}

fn spelling(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let (right, curated) = *pick(SPELLING, "stavning", rng)?;
    let variants = misspellings(right, curated, profile.distractor_strength, rng);
    let (options, correct) = ranked_options(
        right,
        &variants,
        OPTION_COUNT,
        profile.distractor_strength,
        rng,
    )?;
    Ok(mc("Vilket ord stavas rätt?", options, correct).with_help(HINT_SPELLING, HINT_SPELLING))
}

/// Collects curated misspellings and tops them up with mechanical ones.
fn misspellings(right: &str, curated: &[&str], strength: u32, rng: &mut ChaCha8Rng) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if candidate != right && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    };
    for word in curated {
        push((*word).to_owned());
    }
    push(tweak(right, strength));
    let reversed: String = right.chars().rev().collect();
    push(tweak(&reversed, strength).chars().rev().collect());

    let mut attempts = 0;
    while variants.len() < MIN_MISSPELLINGS && attempts < MAX_VARIANT_ATTEMPTS {
        attempts += 1;
        let candidate = substitute_letter(right, rng);
        if candidate != right && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// Applies one rule-based spelling mistake; stronger profiles use subtler rules.
fn tweak(word: &str, strength: u32) -> String {
    if strength >= 70 {
        if word.contains('ä') {
            return word.replacen('ä', "e", 1);
        }
        if word.contains('å') {
            return word.replacen('å', "a", 1);
        }
        if word.contains("kk") {
            return word.replacen("kk", "k", 1);
        }
        return format!("{word}e");
    }
    if word.contains('k') {
        word.replacen('k', "c", 1)
    } else {
        format!("{word}a")
    }
}

fn substitute_letter(word: &str, rng: &mut ChaCha8Rng) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    if letters.is_empty() {
        return String::new();
    }
    let position = rng.random_range(0..letters.len());
    if let Some(slot) = letters.get_mut(position)
        && let Some(letter) = SUBSTITUTE_LETTERS.choose(rng)
    {
        *slot = *letter;
    }
    letters.into_iter().collect()
}

fn word_class(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let allow_prepositions = profile.difficulty() != "easy";
    let classes: Vec<&(&str, &str, &[&str])> = WORD_CLASSES
        .iter()
        .filter(|(name, _, _)| allow_prepositions || *name != "preposition")
        .collect();
    let (name, article, words) = **pick(&classes, "grammatik", rng)?;
    let correct_word = *pick(words, "grammatik", rng)?;

    let mut others: Vec<String> = WORD_CLASSES
        .iter()
        .filter(|(other, _, _)| *other != name)
        .flat_map(|(_, _, other_words)| owned(other_words))
        .collect();
    others.shuffle(rng);
    others.truncate(6);

    let (options, correct) = ranked_options(
        correct_word,
        &others,
        OPTION_COUNT,
        profile.distractor_strength,
        rng,
    )?;
    let help = if name == "preposition" {
        "Prepositioner anger läge/riktning."
    } else {
        HINT_WORD_CLASS
    };
    Ok(mc(format!("Vilket ord är {article} {name}?"), options, correct).with_help(help, help))
}

fn vocabulary(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let synonym = rng.random_bool(0.5);
    let table = if synonym { SYNONYMS } else { ANTONYMS };
    let (base, answer, distractors) = *pick(table, "ordförståelse", rng)?;
    let mut pool = owned(distractors);
    let prompt = if synonym {
        pool.extend([format!("{base}ig"), format!("super{base}")]);
        format!("Vilket ord betyder ungefär samma som '{base}'?")
    } else {
        pool.extend([format!("{base}-lik"), format!("inte {base}")]);
        format!("Vilket ord är motsats till '{base}'?")
    };
    let (options, correct) = ranked_options(
        answer,
        &pool,
        OPTION_COUNT,
        profile.distractor_strength,
        rng,
    )?;
    Ok(mc(prompt, options, correct).with_help(HINT_VOCABULARY, HINT_VOCABULARY))
}

fn sentence_verb(rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let name = *pick(NAMES, "namn", rng)?;
    let place = *pick(PLACES, "platser", rng)?;
    let object = *pick(OBJECTS, "saker", rng)?;
    let action = *pick(ACTIONS, "verb", rng)?;
    let prompt =
        format!("Vilket ord är ett verb i meningen: '{name} {action} i {place} med en {object}.'");
    let (options, correct) = shuffle_with_correct(owned(&[action, name, place, object]), 0, rng)?;
    Ok(mc(prompt, options, correct).with_help(HINT_WORD_CLASS, "Verb är något man gör/är."))
}

/// Generates a drag-and-drop sorting item.
///
/// Three times in five the tiles are sorted by word class; otherwise into
/// prepositions and other words.
///
/// # Errors
///
/// Returns [`GenerationError`] when a word table is too small for the
/// profile's tile count.
pub fn svenska_dnd(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let tile_count = rng.random_range(profile.dnd_tiles.clone());
    let item = if rng.random_ratio(3, 5) {
        word_class_sort(tile_count, profile, rng)?
    } else {
        preposition_sort(tile_count, rng)?
    };
    Ok(item.with_labels(Subject::Svenska.as_str(), profile.difficulty()))
}

fn word_class_sort(
    tile_count: usize,
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Item, GenerationError> {
    let category_count = rng.random_range(profile.dnd_categories.clone());
    let categories: Vec<(&str, &[&str])> = [
        ("Substantiv", NOUNS),
        ("Verb", VERBS),
        ("Adjektiv", ADJECTIVES),
    ]
    .into_iter()
    .take(category_count)
    .collect();
    let per_category = tile_count.checked_div(categories.len()).unwrap_or(0).max(2);

    let mut tiles: Vec<String> = Vec::new();
    let mut solution = BTreeMap::new();
    for (label, words) in &categories {
        for word in pick_many(words, per_category, "ordklasser", rng)? {
            solution.insert(word.to_owned(), (*label).to_owned());
            tiles.push(word.to_owned());
        }
    }

    let fillers: Vec<(&str, &str)> = categories
        .iter()
        .flat_map(|(label, words)| words.iter().map(move |word| (*word, *label)))
        .filter(|(word, _)| !solution.contains_key(*word))
        .collect();
    let missing = tile_count.saturating_sub(tiles.len()).min(fillers.len());
    for (word, label) in fillers.choose_multiple(rng, missing) {
        solution.insert((*word).to_owned(), (*label).to_owned());
        tiles.push((*word).to_owned());
    }
    tiles.shuffle(rng);

    let buckets = categories.iter().map(|(label, _)| Bucket::new(label)).collect();
    Ok(Item::new(
        "grammatik",
        "Dra orden till rätt kategori.",
        ItemKind::Dnd {
            buckets,
            tiles,
            solution,
        },
    )
    .with_help(
        "Substantiv = namn. Verb = gör/är. Adjektiv = beskriver.",
        "Testa 'en/ett' (substantiv), 'att' (verb). Adjektiv beskriver egenskap.",
    ))
}

fn preposition_sort(tile_count: usize, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let preposition_count = tile_count
        .checked_div(2)
        .unwrap_or(0)
        .max(3)
        .min(PREPOSITIONS.len());
    let prepositions = pick_many(PREPOSITIONS, preposition_count, "prepositioner", rng)?;
    let others_pool: Vec<&str> = [NOUNS, VERBS, ADJECTIVES, PRONOUNS].concat();
    let others = pick_many(
        &others_pool,
        tile_count.saturating_sub(prepositions.len()),
        "ordklasser",
        rng,
    )?;

    let mut solution = BTreeMap::new();
    for word in &prepositions {
        solution.insert((*word).to_owned(), "Preposition".to_owned());
    }
    for word in &others {
        solution.insert((*word).to_owned(), "Inte preposition".to_owned());
    }
    let mut tiles: Vec<String> = prepositions
        .into_iter()
        .chain(others)
        .map(str::to_owned)
        .collect();
    tiles.shuffle(rng);

    Ok(Item::new(
        "grammatik",
        "Dra prepositionerna till 'Preposition' och övriga ord till 'Inte preposition'.",
        ItemKind::Dnd {
            buckets: vec![Bucket::new("Preposition"), Bucket::new("Inte preposition")],
            tiles,
            solution,
        },
    )
    .with_help(HINT_PREPOSITION, HINT_PREPOSITION))
}

fn mc(prompt: impl Into<String>, options: Vec<String>, correct: usize) -> Item {
    Item::new("", prompt, ItemKind::Mc { options, correct })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::profile::Level;

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2026)
    }

    #[rstest]
    #[case(SvenskaTask::Stavning, "stavning")]
    #[case(SvenskaTask::Grammatik, "grammatik")]
    #[case(SvenskaTask::Ordforstaelse, "ordförståelse")]
    #[case(SvenskaTask::Meningar, "grammatik")]
    fn items_carry_area_labels_and_a_valid_answer(
        mut rng: ChaCha8Rng,
        #[case] task: SvenskaTask,
        #[case] area: &str,
    ) {
        let profile = Profile::default();
        for _ in 0..25 {
            let item = svenska_item(task, &profile, &mut rng).expect("item");
            let (options, correct) = item.choice().expect("multiple choice");

            assert_eq!(item.area, area);
            assert_eq!(item.topic.as_deref(), Some("svenska"));
            assert_eq!(item.difficulty.as_deref(), Some("np"));
            assert_eq!(options.len(), OPTION_COUNT);
            assert!(correct < options.len());
            let unique: BTreeSet<&String> = options.iter().collect();
            assert_eq!(unique.len(), options.len(), "duplicate option in {options:?}");
        }
    }

    #[rstest]
    fn spelling_answer_is_a_listed_word(mut rng: ChaCha8Rng) {
        let item =
            svenska_item(SvenskaTask::Stavning, &Profile::default(), &mut rng).expect("item");
        let (options, correct) = item.choice().expect("multiple choice");
        let answer = options.get(correct).expect("answer");

        assert!(SPELLING.iter().any(|(right, _)| *right == answer.as_str()));
    }

    #[rstest]
    fn easy_grammar_never_asks_for_prepositions(mut rng: ChaCha8Rng) {
        let profile = Profile::for_level(Level::Easy);
        for _ in 0..60 {
            let item = svenska_item(SvenskaTask::Grammatik, &profile, &mut rng).expect("item");
            assert!(!item.q.contains("preposition"), "{}", item.q);
        }
    }

    #[rstest]
    fn sentence_answer_is_the_verb(mut rng: ChaCha8Rng) {
        let item =
            svenska_item(SvenskaTask::Meningar, &Profile::default(), &mut rng).expect("item");
        let (options, correct) = item.choice().expect("multiple choice");

        assert!(ACTIONS.contains(&options.get(correct).expect("answer").as_str()));
    }

    #[rstest]
    #[case(Level::Easy)]
    #[case(Level::Np)]
    #[case(Level::Hard)]
    fn dnd_tiles_all_have_a_valid_bucket(mut rng: ChaCha8Rng, #[case] level: Level) {
        let profile = Profile::for_level(level);
        for _ in 0..20 {
            let item = svenska_dnd(&profile, &mut rng).expect("dnd");
            let ItemKind::Dnd {
                buckets,
                tiles,
                solution,
            } = &item.kind
            else {
                panic!("expected a dnd item");
            };
            let labels: BTreeSet<&str> =
                buckets.iter().map(|bucket| bucket.label.as_str()).collect();

            assert!(buckets.len() >= 2);
            assert!(tiles.len() >= 2);
            assert_eq!(solution.len(), tiles.len());
            for tile in tiles {
                let bucket = solution.get(tile).expect("tile has a solution");
                assert!(labels.contains(bucket.as_str()));
            }
        }
    }

    #[test]
    fn tweak_prefers_subtle_mistakes_when_strong() {
        assert_eq!(tweak("stjärna", 80), "stjerna");
        assert_eq!(tweak("skola", 35), "scola");
        assert_eq!(tweak("buss", 35), "bussa");
    }

    #[rstest]
    fn misspellings_reach_the_minimum(mut rng: ChaCha8Rng) {
        let variants = misspellings("tjej", &["tjejj"], 60, &mut rng);

        assert!(variants.len() >= MIN_MISSPELLINGS);
        assert!(!variants.iter().any(|variant| variant == "tjej"));
    }
}
