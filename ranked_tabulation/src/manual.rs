/*!

This is the long-form manual for `ranked_tabulation` and `rcvtab`.

## Input

A tabulation takes a list of candidates and a list of ballot entries.

Each candidate has a numeric id, a display name and an `active` flag. Only the
active candidates are tabulated: rankings given to an inactive candidate are
skipped as if the voter had not written them.

Each ballot entry is a triple `(ballot id, candidate id, rank)`. All the entries
with the same ballot id form one ballot, and the candidates are ordered by
increasing rank. Ranks do not need to be contiguous: `1, 3, 7` is the same
preference order as `1, 2, 3`. A ballot is rejected if it gives the same rank
twice, ranks the same candidate twice or uses the rank `0`.

Entries naming a candidate id that is not registered are dropped by default,
with a warning in the logs. This can be turned into an error with
`UnknownCandidateMode::Reject`.

## Methods

### Instant Runoff

Each round, every ballot counts for its most preferred continuing candidate.
Ballots that do not rank any continuing candidate are exhausted and do not count
toward the total. If a candidate has strictly more than half of the total, this
candidate wins. Otherwise the candidates with the fewest votes are eliminated
and a new round starts.

### Coombs

Each round, every ballot counts against its least preferred continuing
candidate. The candidates with the most such votes are eliminated, until a
single candidate is left. Candidates that a ballot does not rank are never
considered as last on that ballot.

The `coombsMajorityStop` option gives the classic form of the method, in which a
candidate holding a majority of first choices wins before any elimination.

### Ranked Pairs

All the head-to-head contests are counted: a ballot prefers A to B when it ranks
both and A comes first. Every pair with a strictly positive margin is a victory.
Victories are locked from the largest margin to the smallest, ties in margin
being ordered by winner id then loser id. A victory that would create a cycle
with the victories already locked is skipped. The winner is the only candidate
that has no locked defeat.

## Ties

When candidates are tied for elimination in instant runoff or Coombs, the
`tiebreakMode` decides:

| mode                | effect                                                    |
|---------------------|-----------------------------------------------------------|
| `eliminateAllTied`  | all the tied candidates are eliminated (default)          |
| `useCandidateOrder` | the tied candidate registered last is eliminated          |
| `random`            | one tied candidate, picked from a hash of `randomSeed`    |

In every mode, a round in which all the continuing candidates are tied ends with
the `all-tied` outcome.

## Outcomes

| outcome            | meaning                                                      |
|--------------------|--------------------------------------------------------------|
| winner             | the elected candidate                                        |
| `all-tied`         | instant runoff or Coombs cannot eliminate anyone             |
| `cycle-unresolved` | ranked pairs ends with zero or several undefeated candidates |
| `empty-input`      | no active candidate or no ballot                             |

## Configuration

`rcvtab` reads an election description in JSON:

```json
{
  "outputSettings": { "contestName": "Board election" },
  "method": "Ranked Pairs",
  "rules": { "tiebreakMode": "eliminateAllTied", "unknownCandidates": "drop" },
  "candidates": [
    { "id": 1, "name": "Alice" },
    { "id": 2, "name": "Bob", "active": false }
  ],
  "ballots": [ { "ballotId": "b1", "candidateId": 1, "rank": 1 } ],
  "ballotFileSources": [ { "provider": "csv", "filePath": "ballots.csv" } ]
}
```

Ballot files are either JSON arrays of entries (provider `json`) or CSV files
with a header and the columns `ballot_id,candidate_id,rank` (provider `csv`).
The provider `csv_ranked` reads one ballot per line: the cells starting at
`firstVoteColumnIndex` hold candidate ids, most preferred first, and the
optional `idColumnIndex` gives the ballot id.

```text
rcvtab --config election.json --method Coombs --out stdout
rcvtab --config election.json --input ballots.csv --reference expected.json
```

*/
