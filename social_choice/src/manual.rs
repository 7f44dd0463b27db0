/*!

This is the long-form manual for `social_choice` and `sctally`.

## Rules

| name        | ballots                    | output                           |
|-------------|----------------------------|----------------------------------|
| `plurality` | partial or full            | winners, first-choice counts     |
| `borda`     | partial or full            | winners, Borda points            |
| `irv`       | partial or full            | winners, round-by-round tallies  |
| `copeland`  | full rankings only         | winners, net pairwise victories  |

`plurality` and `borda` accept partial ballots by default. A partial ballot
earns Borda points only for the ranks it fills: the first choice still gets
`n_alts - 1` points. Use `requireFullRanking` (or `--require-full-ranking`) to
reject such ballots instead.

For `irv`, a ballot that ranks none of the remaining alternatives is exhausted
for the round. Exhausted ballots still count when computing the majority: an
alternative needs strictly more than half of all the ballots. When several
alternatives are tied for elimination, the tie is broken either by the
candidate order (the candidate listed last is eliminated first) or by a seeded
random draw.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, one ballot per row
* `json` a JSON document holding the candidates and the ballots

### `csv`

Each column (in order) is considered to be a choice. The name of the choice in the header is not significant.

```text
id,count,choice 1,choice 2,choice 3
id1,20,A,B,C
id2,20,A,C,
```

The `id` and `count` columns are optional. Empty cells are skipped, which makes
the ballot partial. The first row is a header and is skipped, unless
`firstVoteRowIndex` is `1`. See the [Configuration section](#configuration) on
controlling the optional rows and columns.

A ballot id defaults to `<file name>-<line number>`, and a count to `1`.

### `json`

```text
{
  "candidates": ["A", "B", "C"],
  "ballots": [
    ["A", "B", "C"],
    ["C", "A"],
    { "id": "b3", "count": 12, "ranking": ["B", "A"] }
  ]
}
```

`candidates` is optional. Without it (and without candidates in the
configuration), the candidates are the names found in the ballots, in order of
first appearance.

## Configuration

`sctally` comes with sensible defaults: when no configuration file is given,
every rule is run, the candidates are read from the input (in order of first
appearance), and the ties of `irv` are broken at random with the seed `0`.

A configuration file in JSON may be provided with `--config`:

```text
{
  "outputSettings": { "contestName": "Board election" },
  "fileSource": {
    "provider": "csv",
    "filePath": "ballots.csv",
    "firstVoteColumnIndex": 3,
    "firstVoteRowIndex": 2,
    "idColumnIndex": 1,
    "countColumnIndex": 2
  },
  "candidates": [ { "name": "A" }, { "name": "B" }, { "name": "C" } ],
  "rules": {
    "rules": ["plurality", "borda", "irv", "copeland"],
    "tiebreakMode": "useCandidateOrder",
    "randomSeed": "17",
    "requireFullRanking": false
  }
}
```

- column and row indexes start at 1, as in spreadsheets.
- `filePath` is relative to the directory of the configuration file.
- `tiebreakMode` is either `useCandidateOrder` or `random` (which then needs `randomSeed`).

Command line flags take precedence over the configuration file.

 */
