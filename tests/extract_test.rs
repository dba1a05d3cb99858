use coastal_alert_parser::*;

fn alert(body: &str) -> String {
    format!("{SIGNATURE}\n{body}")
}

fn malformed_field(err: &ParseError) -> Option<Field> {
    match err {
        ParseError::Malformed { field, .. } => Some(*field),
        _ => None,
    }
}

// --- Signature ---

#[test]
fn test_matches_signature() {
    assert!(matches_signature(&alert("anything")));
    assert!(matches_signature(
        "Subject: Coastal Alert: A Transaction Has Occurred on Your Account today"
    ));
}

#[test]
fn test_signature_is_case_sensitive() {
    assert!(!matches_signature(
        "coastal alert: a transaction has occurred on your account"
    ));
    assert!(!matches_signature("Coastal Alert: Your statement is ready"));
}

#[test]
fn test_non_alert_is_skipped() {
    let text = "Account: 1234 Amount: $1.00\nDescription: Shop\nDate: 1 Jan 2020";
    assert!(parse_transaction(text).unwrap().is_none());
}

#[test]
fn test_extract_requires_signature() {
    let text = "Account: 1234 Amount: $1.00\nDescription: Shop\nDate: 1 Jan 2020";
    let err = TransactionRecord::extract(text).unwrap_err();
    assert!(matches!(err, ParseError::MissingSignature));
}

// --- Full records ---

#[test]
fn test_extract_compact_alert() {
    let text = alert("Account:1234 Amount:($45.67)45.67 Description:Grocery Store\n Date: 3 Mar 2022");
    let record = parse_transaction(&text).unwrap().unwrap();

    assert_eq!(record.last_digits(), "1234");
    assert_eq!(record.amount(), "-45.67");
    assert_eq!(record.payee(), "Grocery Store");
    assert_eq!(record.date(), "2022-03-03");
    assert!(record.is_debit());
}

#[test]
fn test_extract_single_space_separators() {
    let text = alert(
        "Account: 4321 Amount: $12.34\n\
         Description: Local Coffee Shop\n\
         Date: 25 Dec 2023\n",
    );
    let record = TransactionRecord::extract(&text).unwrap();

    assert_eq!(record.last_digits(), "4321");
    assert_eq!(record.amount(), "12.34");
    assert_eq!(record.payee(), "Local Coffee Shop");
    assert_eq!(record.date(), "2023-12-25");
    assert!(!record.is_debit());
}

#[test]
fn test_extract_is_deterministic() {
    let text = alert("Account: 4321 Amount: $12.34\nDescription: Shop\nDate: 5 Jan 2024\n");
    let first = TransactionRecord::extract(&text).unwrap();
    let second = TransactionRecord::extract(&text).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_nbsp_matches_whitespace() {
    let spaced = alert(
        "Account: 4321 Amount:  ($12.34)12.34\n\
         Description: Local Coffee Shop\n\
         Date: 25 Dec 2023\n",
    );
    let entities = alert(
        "Account:&nbsp;4321&nbsp;Amount:&nbsp;&nbsp;($12.34)12.34\n\
         Description:&nbsp;Local Coffee Shop\n\
         Date: 25 Dec 2023\n",
    );
    let mixed = alert(
        "Account: &nbsp;\t&nbsp;4321 Amount:&nbsp; ($12.34)&nbsp;12.34\n\
         Description: &nbsp;Local Coffee Shop\n\
         Date: 25 Dec 2023\n",
    );

    let expected = TransactionRecord::extract(&spaced).unwrap();
    assert_eq!(TransactionRecord::extract(&entities).unwrap(), expected);
    assert_eq!(TransactionRecord::extract(&mixed).unwrap(), expected);
    assert_eq!(expected.amount(), "-12.34");
}

#[test]
fn test_fields_bind_after_account_label() {
    let text = alert(
        "Summary Amount: $99.99\n\
         Description: Wrong Payee\n\
         Account: 1111 Amount: $5.00\n\
         Description: Right Payee\n\
         Date: 1 Jun 2021\n",
    );
    let record = TransactionRecord::extract(&text).unwrap();

    assert_eq!(record.amount(), "5.00");
    assert_eq!(record.payee(), "Right Payee");
}

#[test]
fn test_date_found_anywhere() {
    let text = alert("Date: 9 Aug 2020\nAccount: 2222 Amount: $1.50\nDescription: Parking\n");
    let record = TransactionRecord::extract(&text).unwrap();
    assert_eq!(record.date(), "2020-08-09");
}

#[test]
fn test_payee_keeps_punctuation() {
    let text = alert("Account: 2222 Amount: $1.50\nDescription: AMZN Mktp US*2K4 $#@!\nDate: 9 Aug 2020");
    let record = TransactionRecord::extract(&text).unwrap();
    assert_eq!(record.payee(), "AMZN Mktp US*2K4 $#@!");
}

#[test]
fn test_empty_description_gives_empty_payee() {
    let text = alert("Account: 1234 Amount: $1.00\nDescription:\nDate: 5 Jan 2024\n");
    let record = TransactionRecord::extract(&text).unwrap();

    assert_eq!(record.payee(), "");
    assert_eq!(record.date(), "2024-01-05");
}

// --- Amount sign ---

fn amount_of(amount: &str) -> std::result::Result<String, ParseError> {
    let text = alert(&format!(
        "Account: 1234 Amount: {amount}\nDescription: Shop\nDate: 5 Jan 2024\n"
    ));
    TransactionRecord::extract(&text).map(|r| r.amount().to_string())
}

#[test]
fn test_parenthesized_duplicate_is_debit() {
    assert_eq!(amount_of("($12.34)12.34").unwrap(), "-12.34");
}

#[test]
fn test_plain_amount_is_credit() {
    assert_eq!(amount_of("$12.34").unwrap(), "12.34");
}

#[test]
fn test_parenthesized_without_duplicate_is_debit() {
    assert_eq!(amount_of("($7.00)").unwrap(), "-7.00");
}

#[test]
fn test_literal_minus_is_preserved() {
    assert_eq!(amount_of("-$3.50").unwrap(), "-3.50");
}

#[test]
fn test_number_on_next_line_keeps_credit() {
    let text = alert("Account: 1234 Amount: $1.00\n1.00 Description: X\nDate: 5 Jan 2024\n");
    let record = TransactionRecord::extract(&text).unwrap();

    assert_eq!(record.amount(), "1.00");
    assert!(!record.is_debit());
}

#[test]
fn test_thousands_separator_dropped() {
    assert_eq!(amount_of("$2,500.00").unwrap(), "2500.00");
}

#[test]
fn test_mismatched_duplicate_is_malformed() {
    let err = amount_of("($12.34)12.35").unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Amount));
}

#[test]
fn test_amount_needs_two_decimals() {
    let err = amount_of("$12").unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Amount));
}

// --- Missing fields ---

#[test]
fn test_missing_account() {
    let text = alert("Amount: $1.00\nDescription: Shop\nDate: 1 Jan 2020\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::LastDigits));
}

#[test]
fn test_account_digits_wrong_width() {
    let text = alert("Account: 12345 Amount: $1.00\nDescription: Shop\nDate: 1 Jan 2020\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::LastDigits));
}

#[test]
fn test_missing_amount() {
    let text = alert("Account: 1234 Description: Shop\nDate: 1 Jan 2020\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Amount));
}

#[test]
fn test_missing_description() {
    let text = alert("Account: 1234 Amount: $1.00\nDate: 1 Jan 2020\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Payee));
}

#[test]
fn test_description_without_line_break() {
    let text = alert("Date: 1 Jan 2020\nAccount: 1234 Amount: $1.00 Description: Shop");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Payee));
}

#[test]
fn test_missing_date() {
    let text = alert("Account: 1234 Amount: $1.00\nDescription: Shop\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Date));
}

#[test]
fn test_impossible_date() {
    let text = alert("Account: 1234 Amount: $1.00\nDescription: Shop\nDate: 31 Apr 2023\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Date));
}

#[test]
fn test_unknown_month() {
    let text = alert("Account: 1234 Amount: $1.00\nDescription: Shop\nDate: 5 Foo 2024\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert_eq!(malformed_field(&err), Some(Field::Date));
}

#[test]
fn test_malformed_error_names_field() {
    let text = alert("Account: 1234 Amount: $1.00\nDescription: Shop\n");
    let err = TransactionRecord::extract(&text).unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Malformed transaction email, could not parse date")
    );
}

// --- format_date ---

#[test]
fn test_format_date() {
    assert_eq!(format_date("Jan 5, 2024").unwrap(), "2024-01-05");
    assert_eq!(format_date("Dec 25, 2023").unwrap(), "2023-12-25");
}

#[test]
fn test_format_date_crlf() {
    assert_eq!(format_date("Mar\r\n3, 2022").unwrap(), "2022-03-03");
}

#[test]
fn test_format_date_case_insensitive_month() {
    assert_eq!(format_date("feb 9, 2021").unwrap(), "2021-02-09");
}

#[test]
fn test_format_date_leap_day() {
    assert_eq!(format_date("Feb 29, 2024").unwrap(), "2024-02-29");
    assert!(format_date("Feb 29, 2023").is_err());
}

#[test]
fn test_format_date_rejects_garbage() {
    assert!(format_date("Jan 2024").is_err());
    assert!(format_date("Foo 1, 2020").is_err());
    assert!(format_date("Jan 32, 2020").is_err());
    assert!(format_date("").is_err());
}
