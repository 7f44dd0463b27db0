use crate::tally::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
    pub candidates: Vec<String>,
    pub ballots: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    pub _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    pub _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    pub count_column_index: Option<JSValue>,
}

// All the indexes are 1-based in the configuration, as in spreadsheets. The
// accessors return 0-based indexes.
impl FileSource {
    pub fn from_path(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            id_column_index: None,
            count_column_index: None,
        }
    }

    /// Defaults to the first column.
    pub fn first_vote_column_index(&self) -> TallyResult<usize> {
        match self._first_vote_column_index {
            Some(_) => read_js_int(&self._first_vote_column_index),
            None => Ok(0),
        }
    }

    /// Defaults to the second row: the first row is a header.
    pub fn first_vote_row_index(&self) -> TallyResult<usize> {
        match self._first_vote_row_index {
            Some(_) => read_js_int(&self._first_vote_row_index),
            None => Ok(1),
        }
    }

    pub fn id_column_index_int(&self) -> TallyResult<Option<usize>> {
        match self.id_column_index {
            Some(_) => read_js_int(&self.id_column_index).map(Some),
            None => Ok(None),
        }
    }

    pub fn count_column_index_int(&self) -> TallyResult<Option<usize>> {
        match self.count_column_index {
            Some(_) => read_js_int(&self.count_column_index).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TallyCandidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TallyRules {
    pub rules: Option<Vec<Rule>>,
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "requireFullRanking")]
    pub require_full_ranking: Option<bool>,
    #[serde(rename = "rulesDescription")]
    pub rules_description: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSource")]
    pub file_source: Option<FileSource>,
    pub candidates: Option<Vec<TallyCandidate>>,
    pub rules: Option<TallyRules>,
}

pub fn read_config(path: &str) -> TallyResult<TallyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TallyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> TallyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_summary: read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Reads a 1-based index, either as a number or as spreadsheet column letters,
// and returns the 0-based index.
fn read_js_int(x: &Option<JSValue>) -> TallyResult<usize> {
    let idx: usize = match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {})?,
        // Excel-style columns: A is 1, Z is 26, AA is 27.
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => s
            .to_ascii_lowercase()
            .chars()
            .try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'a' as usize + 1)
            })
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {})?,
        _ => None.context(ParsingJsonNumberSnafu {})?,
    };
    ensure!(idx >= 1, ParsingJsonNumberSnafu {});
    Ok(idx - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn js_ints() {
        assert_eq!(read_js_int(&Some(json!(3))).unwrap(), 2);
        assert_eq!(read_js_int(&Some(json!("3"))).unwrap(), 2);
        assert_eq!(read_js_int(&Some(json!("C"))).unwrap(), 2);
        assert_eq!(read_js_int(&Some(json!("aa"))).unwrap(), 26);
        assert!(read_js_int(&Some(json!(0))).is_err());
        assert!(read_js_int(&None).is_err());
        assert!(matches!(
            read_js_int(&Some(json!("ZZZZZZZZZZZZZZZZ"))),
            Err(TallyError::ParsingJsonNumber {})
        ));
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": { "contestName": "test" },
            "fileSource": { "provider": "csv", "filePath": "a.csv", "firstVoteColumnIndex": 2 },
            "candidates": [ { "name": "A" }, { "name": "B" } ],
            "rules": { "rules": ["borda", "irv"], "tiebreakMode": "useCandidateOrder" }
        }"#;
        let config: TallyConfig = serde_json::from_str(js).unwrap();
        let fs = config.file_source.unwrap();
        assert_eq!(fs.first_vote_column_index().unwrap(), 1);
        assert_eq!(fs.first_vote_row_index().unwrap(), 1);
        assert_eq!(fs.count_column_index_int().unwrap(), None);
        assert_eq!(
            config.rules.unwrap().rules,
            Some(vec![Rule::Borda, Rule::InstantRunoff])
        );
    }
}
