pub mod formatter;

pub use formatter::{
    format_assessment, format_assessment_tsv, format_classification, format_handicap, format_json,
    format_prediction, format_round_list, format_round_list_tsv, format_score_pad,
    format_score_pad_tsv, round_summaries, should_use_colors, ClassificationReport,
    HandicapReport, PredictionReport, RoundSummary,
};
