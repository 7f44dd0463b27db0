// Primitives for reading CSV files.

use std::fs::File;

use crate::tally::{io_common::make_default_id, *};

/// Reads one ballot per row. The choices are the candidate names, most
/// preferred first, starting at the first vote column.
pub fn read_csv_ranking(path: &str, cfs: &FileSource) -> TallyResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let count_idx_o = cfs.count_column_index_int()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    let (records, row_offset) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_ranking: {:?} {:?}", lineno, line);
        let id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .to_string()
        } else {
            default_id(lineno)
        };

        let count: Option<u64> = if let Some(count_idx) = count_idx_o {
            let cell = line
                .get(count_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .trim();
            Some(
                cell.parse::<u64>()
                    .ok()
                    .context(CsvCountParseSnafu { lineno, cell })?,
            )
        } else {
            None
        };

        let choices: Vec<String> = line
            .iter()
            .enumerate()
            .filter(|(col, _)| {
                *col >= choices_start_col && Some(*col) != count_idx_o && Some(*col) != id_idx_o
            })
            .map(|(_, s)| s.trim().to_string())
            .collect();
        debug!("read_csv_ranking: lineno: {:?} row: {:?}", lineno, &choices);

        res.push(ParsedBallot {
            id: Some(id),
            count,
            choices,
        });
    }
    Ok(res)
}

fn get_records(
    path: &str,
    cfs: &FileSource,
) -> TallyResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
