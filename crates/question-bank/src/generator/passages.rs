//! Reading-comprehension passages.
//!
//! Template passages are curated stories with fixed questions. Procedural
//! passages are assembled from name, place, activity and object tables, and
//! every question's correct answer is taken from the generated text.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde_json::Map;

use super::{OPTION_COUNT, owned, pick, pick_many};
use crate::error::GenerationError;
use crate::model::{Passage, PassageQuestion, Subject};
use crate::profile::Profile;
use crate::shuffle::shuffle_with_correct;

const HINT_READING: &str = "Läs en gång till och markera nyckelord. Jämför med frågan.";

struct Template {
    title: &'static str,
    text: &'static str,
    questions: &'static [(&'static str, [&'static str; 4], usize)],
}

const TEMPLATES: &[Template] = &[
    Template {
        title: "Lisa och skoldörren",
        text: "Lisa sprang mot skolan. Hon hade nästan försovit sig. När hon kom fram var dörren \
               stängd. Hon knackade försiktigt, och vaktmästaren öppnade med ett leende. Lisa \
               tackade och skyndade till klassrummet.",
        questions: &[
            (
                "Varför sprang Lisa?",
                ["Hon var hungrig", "Hon hade bråttom", "Hon skulle leka", "Hon tappade en bok"],
                1,
            ),
            (
                "Vem öppnade dörren?",
                ["Rektorn", "Läraren", "Vaktmästaren", "Kompisen"],
                2,
            ),
            (
                "Hur kände sig Lisa när dörren öppnades?",
                ["Ledsen", "Arg", "Lättad", "Trött"],
                2,
            ),
        ],
    },
    Template {
        title: "Utflykten till skogen",
        text: "Klassen gick till skogen. De plockade kottar och letade efter spår. Adam hittade \
               ett litet fågelbo på marken. Läraren berättade att man bara fick titta och inte \
               röra.",
        questions: &[
            (
                "Vad hittade Adam?",
                ["Ett fågelbo", "En sten", "En fjäder", "En blomma"],
                0,
            ),
            (
                "Vad sa läraren att man skulle göra?",
                ["Ta med boet hem", "Inte röra boet", "Röra försiktigt", "Bygga ett nytt"],
                1,
            ),
            (
                "Var var klassen?",
                ["I stan", "Vid sjön", "I skogen", "I klassrummet"],
                2,
            ),
        ],
    },
    Template {
        title: "Cykelloppet",
        text: "På lördagen ordnades ett litet cykellopp i parken. Maja pumpade däcken och satte \
               på hjälmen. Hennes kompis Ali hejade vid målet. Maja kom inte först, men hon log \
               ändå.",
        questions: &[
            (
                "Var ägde loppet rum?",
                ["Vid sjön", "I parken", "På skolgården", "I skogen"],
                1,
            ),
            (
                "Vad gjorde Maja före loppet?",
                ["Åt mellis", "Pumpade däcken", "Läste en bok", "Ringde Ali"],
                1,
            ),
            (
                "Hur kände sig Maja efter loppet?",
                ["Besviken", "Arg", "Glad", "Hungrig"],
                2,
            ),
        ],
    },
    Template {
        title: "Bakdagen",
        text: "Klassen bakade bullar i hemkunskapssalen. Noah mätte upp mjöl och socker. Nora \
               rörde i degen. Doften spreds i hela korridoren.",
        questions: &[
            ("Vad bakade klassen?", ["Kakor", "Bullar", "Paj", "Bröd"], 1),
            ("Vem rörde i degen?", ["Noah", "Nora", "Läraren", "Ali"], 1),
            (
                "Var spreds doften?",
                ["På skolgården", "I hela korridoren", "I klassrummet", "I matsalen"],
                1,
            ),
        ],
    },
    Template {
        title: "Städdagen",
        text: "Skolan hade städdag. Eleverna plockade skräp på fotbollsplanen. Läraren delade \
               ut handskar och påsar. Efteråt fikade de i solen.",
        questions: &[
            (
                "Vilken plats städade de?",
                ["Skolgården", "Fotbollsplanen", "Parkeringen", "Matsalen"],
                1,
            ),
            (
                "Vad delade läraren ut?",
                ["Böcker och pennor", "Hjälmar", "Handskar och påsar", "Kepsar"],
                2,
            ),
            (
                "Vad gjorde de efteråt?",
                ["Spelade fotboll", "Åkte hem", "Fikade", "Läste"],
                2,
            ),
        ],
    },
];

const NAMES: &[&str] = &[
    "Lisa", "Ali", "Mira", "Hugo", "Sara", "Noah", "Ella", "Liam", "Ava", "Omar", "Nora",
];
const PLACES: &[&str] = &[
    "skolan", "parken", "biblioteket", "skogen", "matsalen", "skolgården", "lekparken", "museet",
];
/// Objects that take the article `en`.
const OBJECTS: &[&str] = &[
    "boll", "bok", "smörgås", "ryggsäck", "vante", "mössa", "regnjacka", "cykel",
];
const ACTIVITIES: &[&str] = &[
    "läste", "lekte", "sprang", "cyklade", "ritade", "samlade kottar", "hjälpte till",
];
const ENDINGS: &[&str] = &["Allt var bra", "Alla var arga", "Det började regna", "Ingen kom"];

/// Generates a passage: one time in three from a template, otherwise
/// procedurally.
///
/// # Errors
///
/// Returns [`GenerationError`] when a template table cannot supply enough
/// entries.
pub fn svenska_passage(
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Passage, GenerationError> {
    if rng.random_ratio(1, 3) {
        template_passage(profile, rng)
    } else {
        procedural_passage(profile, rng)
    }
}

/// Picks a curated passage, trims it to the profile's word range and draws
/// its questions.
///
/// # Errors
///
/// Returns [`GenerationError`] when the template list is empty or an answer
/// index is out of range.
pub fn template_passage(
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Passage, GenerationError> {
    let template = pick(TEMPLATES, "passager", rng)?;
    let text = trim_words(template.text, rng.random_range(profile.passage_words.clone()));

    let available = template.questions.len();
    let high = (*profile.passage_questions.end()).min(available);
    let low = (*profile.passage_questions.start()).min(high);
    let take = rng.random_range(low..=high);
    let mut drawn: Vec<_> = template.questions.iter().collect();
    drawn.shuffle(rng);

    let questions = drawn
        .into_iter()
        .take(take)
        .map(|(q, options, correct)| question(q, owned(options), *correct, profile, rng))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Passage {
        id: String::new(),
        title: template.title.to_owned(),
        text,
        questions,
        extra: Map::new(),
    })
}

/// Assembles a passage from the name, place, activity and object tables.
///
/// # Errors
///
/// Returns [`GenerationError`] when a table is smaller than the option count.
pub fn procedural_passage(
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Passage, GenerationError> {
    let name = *pick(NAMES, "namn", rng)?;
    let place = *pick(PLACES, "platser", rng)?;
    let activity = *pick(ACTIVITIES, "aktiviteter", rng)?;
    let object = *pick(OBJECTS, "saker", rng)?;
    let ending = "Allt var bra";
    let title = format!("{name} i {place}");
    let text = format!(
        "{name} var i {place}. Hen {activity}. En {object} blev viktig under dagen. Till slut var allt bra."
    );

    let mut candidates = vec![
        ("Var utspelar sig texten?".to_owned(), place, PLACES),
        (format!("Vad gjorde {name}?"), activity, ACTIVITIES),
        ("Vad var viktigt i texten?".to_owned(), object, OBJECTS),
        (format!("Vem var i {place}?"), name, NAMES),
        ("Hur slutade dagen?".to_owned(), ending, ENDINGS),
    ];
    let take = rng
        .random_range(profile.passage_questions.clone())
        .min(candidates.len());
    // The first three questions always come first; extra ones are drawn.
    let mut extra = candidates.split_off(3);
    extra.shuffle(rng);
    candidates.extend(extra);

    let questions = candidates
        .into_iter()
        .take(take)
        .map(|(prompt, answer, table)| {
            let mut options = vec![answer.to_owned()];
            let others: Vec<&str> = table
                .iter()
                .copied()
                .filter(|entry| *entry != answer)
                .collect();
            options.extend(
                pick_many(&others, OPTION_COUNT - 1, "passagefrågor", rng)?
                    .into_iter()
                    .map(str::to_owned),
            );
            question(&prompt, options, 0, profile, rng)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Passage {
        id: String::new(),
        title,
        text,
        questions,
        extra: Map::new(),
    })
}

fn question(
    prompt: &str,
    options: Vec<String>,
    correct: usize,
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<PassageQuestion, GenerationError> {
    let (shuffled, position) = shuffle_with_correct(options, correct, rng)?;
    Ok(PassageQuestion {
        id: String::new(),
        q: prompt.to_owned(),
        options: shuffled,
        correct: position,
        hint: Some(HINT_READING.to_owned()),
        explain: Some(HINT_READING.to_owned()),
        topic: Some(Subject::Svenska.as_str().to_owned()),
        difficulty: Some(profile.difficulty().to_owned()),
        extra: Map::new(),
    })
}

/// Keeps the first `limit` words and makes sure the text ends with a full stop.
fn trim_words(text: &str, limit: usize) -> String {
    let mut trimmed = text
        .split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ");
    if !trimmed.ends_with('.') {
        trimmed.push('.');
    }
    trimmed
}
