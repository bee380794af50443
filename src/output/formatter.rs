use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;

use crate::assess::Assessment;
use crate::classification::{Basis, CategoryKey, NextTier, Tier};
use crate::handicap::RatingSystem;
use crate::round::RoundCatalogue;
use crate::tally::{PadRow, Remaining};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Pretty JSON for `--format json`.
pub fn format_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("Failed to serialize output: {}", e))
}

const LABEL_WIDTH: usize = 14;

/// Format score pad rows as a table.
/// Columns: label, arrows, hits, score, golds, running total.
pub fn format_score_pad(rows: &[PadRow], golds_label: &str, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No arrows shot.".to_string();
    }

    let arrows_width = rows.iter().map(|r| r.arrows.len()).max().unwrap_or(0).max(6);
    let header = format!(
        "{:<lw$}  {:<aw$}  {:>4}  {:>5}  {:>4}  {:>5}",
        "",
        "Arrows",
        "H",
        "S",
        golds_label,
        "RT",
        lw = LABEL_WIDTH,
        aw = arrows_width
    );

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(if use_colors { header.dimmed().to_string() } else { header });

    for row in rows {
        let line = format!(
            "{:<lw$}  {:<aw$}  {:>4}  {:>5}  {:>4}  {:>5}",
            row.label,
            row.arrows,
            row.hits,
            row.score,
            row.golds,
            row.running_total,
            lw = LABEL_WIDTH,
            aw = arrows_width
        );
        if use_colors && !row.is_end() {
            lines.push(line.bold().to_string());
        } else {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Format score pad rows as tab-separated values for scripting
/// Columns: kind, label, arrows, hits, score, golds, running_total (no headers, no colors)
pub fn format_score_pad_tsv(rows: &[PadRow]) -> String {
    rows.iter()
        .map(|row| {
            let kind = if row.is_end() { "end" } else { "total" };
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                kind, row.label, row.arrows, row.hits, row.score, row.golds, row.running_total
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_remaining(remaining: &Remaining) -> String {
    match (remaining.current.is_empty(), remaining.later.is_empty()) {
        (true, true) => "none".to_string(),
        (false, true) => remaining.current.clone(),
        (true, false) => remaining.later.clone(),
        (false, false) => format!("{}, then {}", remaining.current, remaining.later),
    }
}

fn format_tier(tier: &Option<Tier>) -> String {
    match tier {
        Some(t) => t.name.clone(),
        None => "unclassified".to_string(),
    }
}

fn field(name: &str, value: String, use_colors: bool) -> String {
    if use_colors {
        format!("{:<12} {}", format!("{}:", name).dimmed(), value)
    } else {
        format!("{:<12} {}", format!("{}:", name), value)
    }
}

/// Format a full assessment: the score pad followed by a summary block.
pub fn format_assessment(a: &Assessment, use_colors: bool) -> String {
    let tally = &a.tally;
    let mut out = Vec::new();

    if let Some(round) = &a.round {
        out.push(if use_colors {
            round.bold().to_string()
        } else {
            round.clone()
        });
        out.push(String::new());
    }

    out.push(format_score_pad(&tally.rows, tally.golds_mode.label(), use_colors));
    out.push(String::new());

    let t = &tally.totals;
    let average = t
        .average()
        .map(|avg| format!("{:.2}", avg))
        .unwrap_or_else(|| "-".to_string());
    out.push(field(
        "Score",
        format!(
            "{} ({} arrows, {} hits, {} {}, {} Xs, avg {})",
            t.score,
            t.arrows,
            t.hits,
            t.golds,
            tally.golds_mode.label(),
            t.xs,
            average
        ),
        use_colors,
    ));

    if a.round.is_some() {
        let status = if tally.complete {
            if use_colors {
                "complete".green().to_string()
            } else {
                "complete".to_string()
            }
        } else {
            format!("next end {} arrows", tally.next_end_size)
        };
        out.push(field("Status", status, use_colors));
        out.push(field("Remaining", format_remaining(&tally.remaining), use_colors));
    }

    if let Some(h) = a.handicap {
        let clamped = if a.handicap_clamped { ", best in table" } else { "" };
        out.push(field("Handicap", format!("{} ({}{})", h, a.system, clamped), use_colors));
    }
    if let Some(p) = a.predicted_score {
        out.push(field("Predicted", p.to_string(), use_colors));
    }
    if let Some(allowance) = a.allowance {
        out.push(field("Allowance", allowance.to_string(), use_colors));
    }
    if let Some(adjusted) = a.adjusted_score {
        let text = format!("{}{}", adjusted.score, basis_suffix(adjusted.basis));
        out.push(field("Adjusted", text, use_colors));
    }
    if let Some(c) = &a.classification {
        let basis = basis_suffix(c.basis);
        let name = format_tier(&c.tier);
        let name = if use_colors { name.cyan().to_string() } else { name };
        out.push(field("Class", format!("{}{}", name, basis), use_colors));
    }
    if let Some(next) = &a.next_tier {
        out.push(field("Next class", format_next_tier(next), use_colors));
    }

    out.join("\n")
}

/// Format an assessment for scripting: pad rows, then `key\tvalue` lines.
pub fn format_assessment_tsv(a: &Assessment) -> String {
    let mut lines = Vec::new();
    if !a.tally.rows.is_empty() {
        lines.push(format_score_pad_tsv(&a.tally.rows));
    }
    lines.push(format!("score\t{}", a.tally.totals.score));
    lines.push(format!("complete\t{}", a.tally.complete));
    if let Some(h) = a.handicap {
        lines.push(format!("handicap\t{}", h));
    }
    if let Some(p) = a.predicted_score {
        lines.push(format!("predicted\t{}", p));
    }
    if let Some(v) = a.allowance {
        lines.push(format!("allowance\t{}", v));
    }
    if let Some(v) = a.adjusted_score {
        lines.push(format!("adjusted\t{}", v.score));
    }
    if let Some(c) = &a.classification {
        lines.push(format!("class\t{}", format_tier(&c.tier)));
    }
    lines.join("\n")
}

fn basis_suffix(basis: Basis) -> &'static str {
    match basis {
        Basis::Official => "",
        Basis::Predicted => " (predicted)",
    }
}

fn format_next_tier(next: &NextTier) -> String {
    format!("{} in {} more", next.tier.name, next.points_needed)
}

/// Result of a score to handicap lookup.
#[derive(Debug, Clone, Serialize)]
pub struct HandicapReport {
    pub round: String,
    pub score: u32,
    pub system: RatingSystem,
    pub handicap: i32,
    pub fractional: f64,
}

pub fn format_handicap(r: &HandicapReport, use_colors: bool) -> String {
    let h = if use_colors {
        r.handicap.bold().to_string()
    } else {
        r.handicap.to_string()
    };
    format!("{} on {}: handicap {} ({}, {:.2} exact)", r.score, r.round, h, r.system, r.fractional)
}

/// Result of a handicap to score prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub round: String,
    pub handicap: i32,
    pub system: RatingSystem,
    pub score: u32,
    pub max_score: u32,
    pub allowance: u32,
}

pub fn format_prediction(r: &PredictionReport, use_colors: bool) -> String {
    let score = if use_colors {
        r.score.bold().to_string()
    } else {
        r.score.to_string()
    };
    format!(
        "Handicap {} on {}: {} / {} ({}), allowance {}",
        r.handicap, r.round, score, r.max_score, r.system, r.allowance
    )
}

/// Result of a classification lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub category: CategoryKey,
    pub score: u32,
    pub tier: Option<Tier>,
    pub next: Option<NextTier>,
}

pub fn format_classification(r: &ClassificationReport, use_colors: bool) -> String {
    let name = format_tier(&r.tier);
    let name = if use_colors && r.tier.is_some() {
        name.cyan().bold().to_string()
    } else {
        name
    };
    let mut out = format!("{} as {}: {}", r.score, r.category, name);
    if let Some(next) = &r.next {
        out.push_str(&format!(" (next: {})", format_next_tier(next)));
    }
    out
}

/// One line of the round listing.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub id: String,
    pub subtype: Option<String>,
    pub name: String,
    pub distances: String,
    pub arrows: usize,
    pub max_score: u32,
    pub indoor: bool,
}

/// Flatten the catalogue into one summary per round and sub-type.
/// Entries that fail to build are skipped.
pub fn round_summaries(catalogue: &RoundCatalogue) -> Vec<RoundSummary> {
    let mut out = Vec::new();
    for def in &catalogue.rounds {
        let mut variants: Vec<Option<&str>> = Vec::new();
        if def.distances.is_some() || def.subtypes.is_empty() {
            variants.push(None);
        }
        variants.extend(def.subtype_ids().into_iter().map(Some));

        for subtype in variants {
            let Ok(round) = def.structure(subtype) else {
                continue;
            };
            out.push(RoundSummary {
                id: def.id.clone(),
                subtype: subtype.map(str::to_string),
                name: round.name().to_string(),
                distances: round
                    .distances()
                    .iter()
                    .map(|d| format!("{}x{}", d.arrows, d.label()))
                    .collect::<Vec<_>>()
                    .join(" "),
                arrows: round.total_arrows(),
                max_score: round.max_score(),
                indoor: round.is_indoor(),
            });
        }
    }
    out
}

/// Format round summaries as aligned columns: id, name, distances, max score.
pub fn format_round_list(rounds: &[RoundSummary], use_colors: bool) -> String {
    if rounds.is_empty() {
        return "No rounds defined.".to_string();
    }

    let ids: Vec<String> = rounds
        .iter()
        .map(|r| match &r.subtype {
            Some(s) => format!("{} --subtype {}", r.id, s),
            None => r.id.clone(),
        })
        .collect();
    let id_width = ids.iter().map(|s| s.len()).max().unwrap_or(0);
    let name_width = rounds.iter().map(|r| r.name.len()).max().unwrap_or(0);

    rounds
        .iter()
        .zip(&ids)
        .map(|(r, id)| {
            let id = format!("{:<width$}", id, width = id_width);
            let name = format!("{:<width$}", r.name, width = name_width);
            if use_colors {
                format!("{}  {}  {}  {}", id.cyan(), name.bold(), r.distances, r.max_score.dimmed())
            } else {
                format!("{}  {}  {}  {}", id, name, r.distances, r.max_score)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format round summaries as tab-separated values for scripting
pub fn format_round_list_tsv(rounds: &[RoundSummary]) -> String {
    rounds
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                r.id,
                r.subtype.as_deref().unwrap_or(""),
                r.name,
                r.distances,
                r.arrows,
                r.max_score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handicap::Handicapper;
    use crate::round::structure::leg;
    use crate::round::{RoundStructure, Unit};
    use crate::scoring::{parse_arrows, FaceScoring};
    use crate::tally::{ShotRecord, TallyOptions};

    fn round() -> RoundStructure {
        RoundStructure::new(
            "Short",
            vec![leg(20.0, Unit::Yards, 12, 60.0)],
            true,
            FaceScoring::TenZone,
        )
        .unwrap()
    }

    fn assessment(arrows: &str) -> Assessment {
        let round = round();
        let record = ShotRecord::new(parse_arrows(arrows).unwrap(), Some(&round));
        let hc = Handicapper::for_system(RatingSystem::Current);
        crate::assess::assess(&record, &hc, &TallyOptions::default(), None).unwrap()
    }

    #[test]
    fn test_empty_pad() {
        assert_eq!(format_score_pad(&[], "10+", false), "No arrows shot.");
    }

    #[test]
    fn test_pad_lists_ends_and_totals() {
        let a = assessment("X 10 9 9 8 7 m 1 2 3 4 5");
        let pad = format_score_pad(&a.tally.rows, "10+", false);
        let lines: Vec<&str> = pad.lines().collect();
        // header, two ends, distance subtotal, grand total
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("7 8 9 9 10 X"));
        assert!(lines[2].contains("m 1 2 3 4 5"));
        assert!(lines[4].trim_end().ends_with("68"));
    }

    #[test]
    fn test_pad_tsv() {
        let a = assessment("X 10 9 9 8 7");
        let tsv = format_score_pad_tsv(&a.tally.rows);
        let first = tsv.lines().next().unwrap();
        assert!(first.starts_with("end\t"));
        assert_eq!(first.split('\t').count(), 7);
    }

    #[test]
    fn test_assessment_summary() {
        let a = assessment("X 10 9 9 8 7");
        let text = format_assessment(&a, false);
        assert!(text.starts_with("Short"));
        assert!(text.contains("Score:"));
        assert!(text.contains("next end 6 arrows"));
        assert!(text.contains("6 at 20yd"));

        let tsv = format_assessment_tsv(&a);
        assert!(tsv.contains("score\t53"));
        assert!(tsv.contains("complete\tfalse"));
    }

    #[test]
    fn test_adjusted_score_shows_basis() {
        let mut a = assessment("X 10 9 9 8 7");
        a.handicap = Some(0);
        a.handicap_clamped = true;
        a.adjusted_score = Some(crate::assess::AdjustedScore {
            score: 612,
            basis: Basis::Predicted,
        });
        let text = format_assessment(&a, false);
        assert!(text.contains("(current, best in table)"));
        assert!(text.contains("612 (predicted)"));
        assert!(format_assessment_tsv(&a).contains("adjusted\t612"));
    }

    #[test]
    fn test_json_output() {
        let a = assessment("X 10");
        let json = format_json(&a).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tally"]["totals"]["score"], 20);
        assert_eq!(value["system"], "current");
    }

    #[test]
    fn test_handicap_and_prediction_lines() {
        let r = HandicapReport {
            round: "Portsmouth".to_string(),
            score: 550,
            system: RatingSystem::Current,
            handicap: 40,
            fractional: 39.6,
        };
        assert_eq!(
            format_handicap(&r, false),
            "550 on Portsmouth: handicap 40 (current, 39.60 exact)"
        );

        let p = PredictionReport {
            round: "Portsmouth".to_string(),
            handicap: 40,
            system: RatingSystem::Legacy,
            score: 551,
            max_score: 600,
            allowance: 100,
        };
        assert_eq!(
            format_prediction(&p, false),
            "Handicap 40 on Portsmouth: 551 / 600 (legacy), allowance 100"
        );
    }

    #[test]
    fn test_classification_line() {
        let r = ClassificationReport {
            category: CategoryKey::new("recurve", "male", "adult", "portsmouth", None),
            score: 10,
            tier: None,
            next: None,
        };
        assert_eq!(
            format_classification(&r, false),
            "10 as recurve/male/adult/portsmouth: unclassified"
        );
    }

    #[test]
    fn test_round_summaries_expand_subtypes() {
        let catalogue: RoundCatalogue = serde_saphyr::from_str(
            r#"
rounds:
  - id: national
    name: National
    unit: yards
    face: five_zone
    legs:
      - { arrows: 48, face_cm: 122 }
      - { arrows: 24, face_cm: 122 }
    distances: [60, 50]
    subtypes:
      - { id: long, name: "Long National", distances: [80, 60] }
"#,
        )
        .unwrap();
        let summaries = round_summaries(&catalogue);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].distances, "48x60yd 24x50yd");
        assert_eq!(summaries[0].max_score, 648);
        assert_eq!(summaries[1].subtype.as_deref(), Some("long"));

        let listing = format_round_list(&summaries, false);
        assert!(listing.contains("national --subtype long"));
        assert_eq!(format_round_list_tsv(&summaries).lines().count(), 2);
    }
}
