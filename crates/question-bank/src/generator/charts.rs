//! Bar chart items.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{owned, pick};
use crate::error::GenerationError;
use crate::model::{Chart, Item, ItemKind, Subject};
use crate::profile::Profile;
use crate::shuffle::shuffle_with_correct;

const LABEL_SETS: &[&[&str]] = &[
    &["Mån", "Tis", "Ons", "Tors"],
    &["Röd", "Blå", "Grön", "Gul"],
    &["Äpple", "Banan", "Päron", "Apelsin"],
    &["Hund", "Katt", "Kanin", "Fisk"],
    &["Keps", "Mössa", "Halsduk", "Vantar"],
    &["Boll", "Snöre", "Spel", "Bok"],
];
const UNITS: &[&str] = &["st", "elever", "frukter", "röster", "poäng"];
const TITLES: &[&str] = &[
    "Antal i klassen",
    "Sålda frukter",
    "Röster i omröstning",
    "Utlånade böcker",
    "Samlade poäng",
];
const AREA: &str = "diagram";

/// Draws a four-bar dataset with values from 1 to 9.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyPool`] when a label, unit or title table is
/// empty.
pub fn bar_dataset(rng: &mut ChaCha8Rng) -> Result<Chart, GenerationError> {
    let labels = owned(pick(LABEL_SETS, "diagram", rng)?);
    let values = labels.iter().map(|_| rng.random_range(1..=9)).collect();
    Ok(Chart {
        labels,
        values,
        unit: (*pick(UNITS, "enheter", rng)?).to_owned(),
        title: (*pick(TITLES, "rubriker", rng)?).to_owned(),
    })
}

/// Builds a "which bar is highest" item; ties resolve to the first bar.
#[must_use]
pub fn bar_max(chart: Chart) -> Item {
    let mut best = 0;
    let mut best_value = 0;
    for (position, value) in chart.values.iter().enumerate() {
        if *value > best_value {
            best = position;
            best_value = *value;
        }
    }
    let label = chart.labels.get(best).cloned().unwrap_or_default();
    let prompt = format!("Vilken har flest i '{}'?", chart.title);
    let explain = format!("Den högsta stapeln är {label} ({best_value} {}).", chart.unit);
    let options = chart.labels.clone();
    Item::new(
        AREA,
        prompt,
        ItemKind::BarMax {
            chart,
            options,
            correct: best,
        },
    )
    .with_help("Titta på stapeln som är högst.", explain)
}

/// Builds a "how many more" item comparing a higher bar with a lower one.
///
/// # Errors
///
/// Returns [`GenerationError`] when the chart has fewer than two bars.
pub fn bar_compare(chart: Chart, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let bars: Vec<(&String, u32)> = chart.labels.iter().zip(chart.values.iter().copied()).collect();
    let mut pairs: Vec<((&String, u32), (&String, u32))> = Vec::new();
    for high in &bars {
        for low in &bars {
            if high.1 > low.1 {
                pairs.push((*high, *low));
            }
        }
    }
    if pairs.is_empty() {
        // Every bar has the same height; compare the first two.
        if let (Some(first), Some(second)) = (bars.first(), bars.get(1)) {
            pairs.push((*first, *second));
        }
    }
    let ((high_label, high_value), (low_label, low_value)) = *pick(&pairs, "diagram", rng)?;
    let difference = high_value - low_value;

    let mut candidates = vec![difference, difference + 1, difference + 2];
    if difference > 0 {
        candidates.push(difference - 1);
    }
    let (options, correct) = shuffle_with_correct(
        candidates.iter().map(ToString::to_string).collect(),
        0,
        rng,
    )?;

    let prompt = format!(
        "Hur många fler {} är det i {high_label} än i {low_label}?",
        chart.unit
    );
    let explain = format!(
        "{high_label} har {high_value} och {low_label} har {low_value}. \
         Skillnad = {difference}."
    );
    Ok(Item::new(
        AREA,
        prompt,
        ItemKind::BarCompare {
            chart,
            options,
            correct,
        },
    )
    .with_help(
        "Jämför staplarnas höjd: skillnaden är hur mycket högre den ena är.",
        explain,
    ))
}

/// Generates the `index`-th chart item of a run: even positions ask for the
/// highest bar, odd positions for a difference.
///
/// # Errors
///
/// Propagates [`bar_dataset`] and [`bar_compare`] errors.
pub fn chart_item(
    index: usize,
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Item, GenerationError> {
    let chart = bar_dataset(rng)?;
    let item = if index.checked_rem(2) == Some(0) {
        bar_max(chart)
    } else {
        bar_compare(chart, rng)?
    };
    Ok(item.with_labels(Subject::Matematik.as_str(), profile.difficulty()))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2026)
    }

    fn chart(values: &[u32]) -> Chart {
        Chart {
            labels: owned(&["Mån", "Tis", "Ons", "Tors"]),
            values: values.to_vec(),
            unit: "st".to_owned(),
            title: "Antal i klassen".to_owned(),
        }
    }

    #[test]
    fn bar_max_picks_the_first_highest_bar() {
        let item = bar_max(chart(&[3, 7, 7, 1]));

        assert_eq!(item.choice(), Some((&owned(&["Mån", "Tis", "Ons", "Tors"])[..], 1)));
        assert_eq!(item.explain.as_deref(), Some("Den högsta stapeln är Tis (7 st)."));
    }

    #[rstest]
    fn bar_compare_names_the_higher_bar_first(mut rng: ChaCha8Rng) {
        for _ in 0..20 {
            let item = bar_compare(chart(&[2, 9, 5, 4]), &mut rng).expect("item");
            let (options, correct) = item.choice().expect("choice");
            let answer: u32 = options.get(correct).expect("answer").parse().expect("number");
            let rest = item.q.strip_prefix("Hur många fler st är det i ").expect("prompt");
            let (high, low) = rest
                .strip_suffix('?')
                .and_then(|body| body.split_once(" än i "))
                .expect("two labels");
            let value_of = |label: &str| match label {
                "Mån" => 2,
                "Tis" => 9,
                "Ons" => 5,
                _ => 4,
            };

            assert!(value_of(high) > value_of(low));
            assert_eq!(answer, value_of(high) - value_of(low));
        }
    }

    #[rstest]
    fn level_bars_still_compare(mut rng: ChaCha8Rng) {
        let item = bar_compare(chart(&[4, 4, 4, 4]), &mut rng).expect("item");
        let (options, correct) = item.choice().expect("choice");

        assert_eq!(options.get(correct).map(String::as_str), Some("0"));
    }

    #[rstest]
    fn chart_items_alternate(mut rng: ChaCha8Rng) {
        let profile = Profile::default();
        let items: Vec<Item> = (0..4)
            .map(|index| chart_item(index, &profile, &mut rng).expect("item"))
            .collect();
        let kinds: Vec<&str> = items.iter().map(Item::type_name).collect();

        assert_eq!(kinds, ["bar-max", "bar-compare", "bar-max", "bar-compare"]);
    }
}
