//! Grouping records by calendar month and computing month-by-month balances.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{
    Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::models::{Timestamped, Transaction, TransactionKind};

const NAIVE_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day][first [T] [ ]][hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
);
const OFFSET_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day][first [T] [ ]][hour]:[minute][optional [:[second][optional [.[subsecond]]]]][offset_hour sign:mandatory][optional [:]][offset_minute]"
);
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A calendar month, written as `YYYY-MM`.
///
/// Internally this is the first day of the month, so keys sort
/// chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(Date);

/// The error returned when a string is not a `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a month in the format YYYY-MM")]
pub struct InvalidMonthKey(pub String);

impl MonthKey {
    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self(date.saturating_sub(Duration::days(i64::from(date.day()) - 1)))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The month of the year.
    pub fn month(&self) -> Month {
        self.0.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.0
    }

    /// A compact label such as "Jan 2024", used on chart axes.
    pub fn short_label(&self) -> String {
        let month = match self.month() {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        };

        format!("{month} {}", self.year())
    }

    /// A full label such as "January 2024", used in the month selector.
    pub fn long_label(&self) -> String {
        format!("{} {}", self.month(), self.year())
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month() as u8)
    }
}

impl FromStr for MonthKey {
    type Err = InvalidMonthKey;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonthKey(text.to_owned());

        let (year, month) = text.split_once('-').ok_or_else(invalid)?;

        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

        if year.len() != 4 || month.len() != 2 || !is_digits(year) || !is_digits(month) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = InvalidMonthKey;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<MonthKey> for String {
    fn from(month: MonthKey) -> Self {
        month.to_string()
    }
}

/// Why a record was left out of a [MonthlyGroups].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The record has neither `timestamp` nor `createdAt`.
    MissingTimestamp,
    /// The record's timestamp could not be parsed. Holds the parse error.
    Unparseable(String),
}

/// A record that could not be placed in a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    /// The position of the record in the input.
    pub index: usize,
    /// Why the record was dropped.
    pub reason: DropReason,
}

/// Records bucketed by month, plus the records that had no usable timestamp.
#[derive(Debug)]
pub struct MonthlyGroups<'a, R> {
    /// The records of each month, in input order.
    pub months: BTreeMap<MonthKey, Vec<&'a R>>,
    /// The records that were left out.
    pub dropped: Vec<DroppedRecord>,
}

impl<'a, R> MonthlyGroups<'a, R> {
    /// The months that have at least one record, oldest first.
    pub fn month_keys(&self) -> Vec<MonthKey> {
        self.months.keys().copied().collect()
    }

    /// The records of `month`, empty if there are none.
    pub fn get(&self, month: &MonthKey) -> &[&'a R] {
        self.months.get(month).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every grouped record, oldest month first.
    pub fn flatten(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.months.values().flatten().copied()
    }
}

/// Groups records by the month of their timestamp, in UTC.
///
/// See [group_by_month_at].
pub fn group_by_month<'a, R: Timestamped + 'a>(
    records: impl IntoIterator<Item = &'a R>,
) -> MonthlyGroups<'a, R> {
    group_by_month_at(records, UtcOffset::UTC)
}

/// Groups records by the month of their timestamp.
///
/// The timestamp of a record is its `timestamp` field, falling back to
/// `createdAt`. Timestamps with a UTC offset are converted to `offset`
/// before taking the month; timestamps without one are used as-is.
///
/// Records without a timestamp, or with one that cannot be parsed, are not
/// grouped. They are listed in [MonthlyGroups::dropped] instead, so this
/// never fails.
pub fn group_by_month_at<'a, R: Timestamped + 'a>(
    records: impl IntoIterator<Item = &'a R>,
    offset: UtcOffset,
) -> MonthlyGroups<'a, R> {
    let mut groups = MonthlyGroups {
        months: BTreeMap::new(),
        dropped: Vec::new(),
    };

    for (index, record) in records.into_iter().enumerate() {
        match record_month(record, offset) {
            Ok(month) => groups.months.entry(month).or_default().push(record),
            Err(reason) => groups.dropped.push(DroppedRecord { index, reason }),
        }
    }

    groups
}

/// The records that fall in `month`, in input order.
pub fn filter_to_month<'a, R: Timestamped + 'a>(
    records: impl IntoIterator<Item = &'a R>,
    month: MonthKey,
    offset: UtcOffset,
) -> Vec<&'a R> {
    records
        .into_iter()
        .filter(|record| record_month(*record, offset) == Ok(month))
        .collect()
}

/// Sums the net effect of transactions on net worth for each month.
///
/// Credits add to the month's total, debits and debts subtract from it.
/// Transactions of unknown kind or without a usable timestamp are skipped.
pub fn monthly_net_flow_at<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    offset: UtcOffset,
) -> BTreeMap<MonthKey, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        let signed_amount = match transaction.kind {
            TransactionKind::Credit => transaction.amount,
            TransactionKind::Debit | TransactionKind::Debt => -transaction.amount,
            TransactionKind::Other(_) => continue,
        };

        let Ok(month) = record_month(transaction, offset) else {
            continue;
        };

        *totals.entry(month).or_insert(0.0) += signed_amount;
    }

    totals
}

/// Calculates the balance at the end of each month by working backwards
/// from the current balance.
///
/// # Returns
/// One `(month, balance)` pair per month in `monthly_net_flow`, oldest first.
/// The latest month's balance is `current_balance`.
pub fn running_balances(
    current_balance: f64,
    monthly_net_flow: &BTreeMap<MonthKey, f64>,
) -> Vec<(MonthKey, f64)> {
    let mut balances = Vec::with_capacity(monthly_net_flow.len());
    let mut cumulative = 0.0;

    for (month, net_flow) in monthly_net_flow.iter().rev() {
        balances.push((*month, current_balance - cumulative));
        cumulative += net_flow;
    }

    balances.reverse();
    balances
}

fn record_month<R: Timestamped>(record: &R, offset: UtcOffset) -> Result<MonthKey, DropReason> {
    let timestamp = record
        .resolve_timestamp()
        .ok_or(DropReason::MissingTimestamp)?;

    parse_timestamp_date(timestamp, offset)
        .map(MonthKey::from_date)
        .map_err(|error| DropReason::Unparseable(format!("{timestamp:?}: {error}")))
}

/// Parses an ISO 8601 timestamp and returns its calendar date.
///
/// Accepts RFC 3339 date-times and the looser ISO 8601 forms: a space instead
/// of `T`, no seconds, offsets without a colon, no offset at all, plain dates
/// and `YYYY-MM` months (the first of the month).
fn parse_timestamp_date(timestamp: &str, offset: UtcOffset) -> Result<Date, time::error::Parse> {
    let to_local_date = |date_time: OffsetDateTime| {
        date_time
            .checked_to_offset(offset)
            .unwrap_or(date_time)
            .date()
    };

    if let Ok(date_time) = OffsetDateTime::parse(timestamp, &Rfc3339) {
        return Ok(to_local_date(date_time));
    }

    if let Some(utc_time) = timestamp.strip_suffix('Z') {
        if let Ok(date_time) = PrimitiveDateTime::parse(utc_time, NAIVE_DATE_TIME_FORMAT) {
            return Ok(to_local_date(date_time.assume_utc()));
        }
    }

    if let Ok(date_time) = OffsetDateTime::parse(timestamp, OFFSET_DATE_TIME_FORMAT) {
        return Ok(to_local_date(date_time));
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(timestamp, NAIVE_DATE_TIME_FORMAT) {
        return Ok(date_time.date());
    }

    if let Ok(month) = timestamp.parse::<MonthKey>() {
        return Ok(month.first_day());
    }

    Date::parse(timestamp, DATE_FORMAT)
}

#[cfg(test)]
mod month_key_tests {
    use time::{Month, macros::date};

    use super::{InvalidMonthKey, MonthKey};

    #[test]
    fn from_date_uses_first_of_month() {
        let month = MonthKey::from_date(date!(2024 - 02 - 29));

        assert_eq!(month.first_day(), date!(2024 - 02 - 01));
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), Month::February);
    }

    #[test]
    fn displays_as_year_dash_month() {
        assert_eq!(MonthKey::from_date(date!(2024 - 01 - 15)).to_string(), "2024-01");
        assert_eq!(MonthKey::from_date(date!(2023 - 12 - 31)).to_string(), "2023-12");
    }

    #[test]
    fn parses_year_dash_month() {
        assert_eq!(
            "2024-03".parse::<MonthKey>(),
            Ok(MonthKey::from_date(date!(2024 - 03 - 01)))
        );
    }

    #[test]
    fn rejects_malformed_months() {
        for text in [
            "", "2024", "2024-1", "2024-13", "2024-00", "24-01", "2024-01-01", "abcd-ef", "+202-01",
            "2024-+1",
        ] {
            assert_eq!(
                text.parse::<MonthKey>(),
                Err(InvalidMonthKey(text.to_owned())),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn orders_chronologically() {
        let mut months = vec![
            MonthKey::from_date(date!(2024 - 02 - 01)),
            MonthKey::from_date(date!(2023 - 12 - 01)),
            MonthKey::from_date(date!(2024 - 01 - 01)),
        ];

        months.sort();

        let labels: Vec<String> = months.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn formats_labels() {
        let month = MonthKey::from_date(date!(2024 - 09 - 10));

        assert_eq!(month.short_label(), "Sep 2024");
        assert_eq!(month.long_label(), "September 2024");
    }

    #[test]
    fn serializes_as_string() {
        let month = MonthKey::from_date(date!(2024 - 09 - 10));

        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-09\"");
        assert_eq!(serde_json::from_str::<MonthKey>("\"2024-09\"").unwrap(), month);
        assert!(serde_json::from_str::<MonthKey>("\"September\"").is_err());
    }
}

#[cfg(test)]
mod group_by_month_tests {
    use time::{UtcOffset, macros::date};

    use crate::models::{Account, BudgetLine, Transaction, TransactionKind};

    use super::{DropReason, DroppedRecord, MonthKey, filter_to_month, group_by_month, group_by_month_at};

    fn month(text: &str) -> MonthKey {
        text.parse().unwrap()
    }

    fn transaction_at(timestamp: &str, amount: f64) -> Transaction {
        Transaction::build(amount, TransactionKind::Debit, "Test").timestamp(timestamp)
    }

    #[test]
    fn groups_records_by_month() {
        let transactions = vec![
            transaction_at("2024-01-15T10:00:00Z", 1.0),
            transaction_at("2024-02-01T00:00:00Z", 2.0),
            transaction_at("2024-01-31T23:59:59Z", 3.0),
        ];

        let groups = group_by_month(&transactions);

        assert_eq!(groups.month_keys(), vec![month("2024-01"), month("2024-02")]);
        let january: Vec<f64> = groups.get(&month("2024-01")).iter().map(|t| t.amount).collect();
        assert_eq!(january, vec![1.0, 3.0]);
        assert!(groups.dropped.is_empty());
    }

    #[test]
    fn falls_back_to_created_at() {
        let lines = vec![BudgetLine::build(100.0, "Needs", "Rent").created_at("2024-05-03T00:00:00Z")];

        let groups = group_by_month(&lines);

        assert_eq!(groups.get(&month("2024-05")).len(), 1);
    }

    #[test]
    fn drops_records_without_timestamps() {
        let accounts = vec![
            Account::build("Checking", 10.0),
            Account::build("Savings", 20.0).created_at("2024-01-01T00:00:00Z"),
        ];

        let groups = group_by_month(&accounts);

        assert_eq!(groups.flatten().count(), 1);
        assert_eq!(
            groups.dropped,
            vec![DroppedRecord {
                index: 0,
                reason: DropReason::MissingTimestamp
            }]
        );
    }

    #[test]
    fn drops_unparseable_timestamps_without_failing() {
        let transactions = vec![
            transaction_at("yesterday", 1.0),
            transaction_at("2024-13-01T00:00:00Z", 2.0),
            transaction_at("2024-01-01T00:00:00Z", 3.0),
        ];

        let groups = group_by_month(&transactions);

        assert_eq!(groups.flatten().count(), 1);
        assert_eq!(groups.dropped.len(), 2);
        assert_eq!(groups.dropped[0].index, 0);
        assert_eq!(groups.dropped[1].index, 1);
        assert!(
            groups
                .dropped
                .iter()
                .all(|dropped| matches!(dropped.reason, DropReason::Unparseable(_)))
        );
    }

    #[test]
    fn accepts_naive_date_times_and_plain_dates() {
        let transactions = vec![
            transaction_at("2024-03-10T08:30:00", 1.0),
            transaction_at("2024-03-10T08:30:00.250", 2.0),
            transaction_at("2024-04-02", 3.0),
            transaction_at("2024-04-02T08:30:00.000+13:00", 4.0),
        ];

        let groups = group_by_month(&transactions);

        assert!(groups.dropped.is_empty(), "dropped: {:?}", groups.dropped);
        assert_eq!(groups.get(&month("2024-03")).len(), 2);
        assert_eq!(groups.get(&month("2024-04")).len(), 2);
    }

    #[test]
    fn accepts_utc_times_without_seconds() {
        let transactions = vec![transaction_at("2024-01-31T20:30Z", 1.0)];
        let auckland = UtcOffset::from_hms(13, 0, 0).unwrap();

        let groups = group_by_month_at(&transactions, auckland);

        assert!(groups.dropped.is_empty(), "dropped: {:?}", groups.dropped);
        assert_eq!(groups.month_keys(), vec![month("2024-02")]);
    }

    #[test]
    fn accepts_space_separated_date_times() {
        let transactions = vec![
            transaction_at("2024-01-15 10:30:00", 1.0),
            transaction_at("2024-01-15 10:30", 2.0),
        ];

        let groups = group_by_month(&transactions);

        assert!(groups.dropped.is_empty(), "dropped: {:?}", groups.dropped);
        assert_eq!(groups.get(&month("2024-01")).len(), 2);
    }

    #[test]
    fn accepts_offsets_without_a_colon() {
        let transactions = vec![transaction_at("2024-02-01T08:00:00+1300", 1.0)];

        let groups = group_by_month(&transactions);

        assert!(groups.dropped.is_empty(), "dropped: {:?}", groups.dropped);
        assert_eq!(groups.month_keys(), vec![month("2024-01")]);
    }

    #[test]
    fn accepts_year_and_month_only() {
        let transactions = vec![transaction_at("2024-01", 1.0)];

        let groups = group_by_month(&transactions);

        assert!(groups.dropped.is_empty(), "dropped: {:?}", groups.dropped);
        assert_eq!(groups.month_keys(), vec![month("2024-01")]);
    }

    #[test]
    fn converts_offset_timestamps_to_the_given_offset() {
        let transactions = vec![transaction_at("2024-01-31T20:00:00Z", 1.0)];
        let auckland = UtcOffset::from_hms(13, 0, 0).unwrap();

        let utc_groups = group_by_month(&transactions);
        let local_groups = group_by_month_at(&transactions, auckland);

        assert_eq!(utc_groups.month_keys(), vec![month("2024-01")]);
        assert_eq!(local_groups.month_keys(), vec![month("2024-02")]);
    }

    #[test]
    fn regrouping_the_output_is_idempotent() {
        let transactions = vec![
            transaction_at("2024-02-10T00:00:00Z", 1.0),
            Transaction::build(2.0, TransactionKind::Credit, "Undated"),
            transaction_at("2024-01-10T00:00:00Z", 3.0),
            transaction_at("not a date", 4.0),
            transaction_at("2024-02-11T00:00:00Z", 5.0),
        ];

        let groups = group_by_month(&transactions);
        let regrouped = group_by_month(groups.flatten());

        assert_eq!(regrouped.months, groups.months);
        assert!(regrouped.dropped.is_empty());
    }

    #[test]
    fn handles_empty_input() {
        let transactions: Vec<Transaction> = Vec::new();

        let groups = group_by_month(&transactions);

        assert!(groups.months.is_empty());
        assert!(groups.dropped.is_empty());
    }

    #[test]
    fn filter_to_month_keeps_only_that_month() {
        let transactions = vec![
            transaction_at("2024-01-15T00:00:00Z", 1.0),
            transaction_at("2024-02-15T00:00:00Z", 2.0),
            Transaction::build(3.0, TransactionKind::Debit, "Undated"),
            transaction_at("2024-01-20T00:00:00Z", 4.0),
        ];

        let january = filter_to_month(&transactions, month("2024-01"), UtcOffset::UTC);

        let amounts: Vec<f64> = january.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1.0, 4.0]);
    }

    #[test]
    fn month_key_matches_date() {
        let transactions = vec![transaction_at("2024-07-04", 1.0)];

        let groups = group_by_month(&transactions);

        assert_eq!(groups.month_keys(), vec![MonthKey::from_date(date!(2024 - 07 - 01))]);
    }
}
