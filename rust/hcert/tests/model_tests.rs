// Licensed under the MIT License.

use chrono::{TimeZone as _, Utc};
use hcert::model::parse_date_text;
use hcert::{CertificateType, ErrorKind, PartialDate, ValidityInterval};

#[test]
fn validity_intervals_parse_iso_8601() {
    assert_eq!("P15D".parse::<ValidityInterval>().unwrap(), ValidityInterval::from_days(15));
    assert_eq!("P18M".parse::<ValidityInterval>().unwrap(), ValidityInterval::from_months(18));
    assert_eq!("PT48H".parse::<ValidityInterval>().unwrap(), ValidityInterval::from_hours(48));
    assert_eq!("P2W".parse::<ValidityInterval>().unwrap(), ValidityInterval::from_days(14));

    let full: ValidityInterval = "P1Y2M3DT4H5M6S".parse().unwrap();
    assert_eq!(full.months, 14);
    assert_eq!(full.days, 3);
    assert_eq!(full.seconds, 4 * 3600 + 5 * 60 + 6);
    assert_eq!(full.to_string(), "P14M3DT4H5M6S");
}

#[test]
fn malformed_intervals_are_rejected() {
    for bad in ["", "P", "15D", "PT", "P1H", "PT1D", "P1", "PD", "P1DT", "P1M1", "PTT1H", "P99999999999D"] {
        let err = bad.parse::<ValidityInterval>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{bad:?}");
    }
}

#[test]
fn month_arithmetic_rolls_past_short_months() {
    let start = Utc.with_ymd_and_hms(2000, 1, 31, 0, 0, 0).unwrap();
    let end = ValidityInterval::from_months(1).add_to(start).unwrap();
    assert_eq!(end, Utc.with_ymd_and_hms(2000, 3, 2, 0, 0, 0).unwrap());

    // 18 months after 2021-08-31 lands in February 2023, three days short.
    let start = Utc.with_ymd_and_hms(2021, 8, 31, 14, 30, 0).unwrap();
    let end = ValidityInterval::from_months(18).add_to(start).unwrap();
    assert_eq!(end, Utc.with_ymd_and_hms(2023, 3, 3, 14, 30, 0).unwrap());

    // Days that exist in the target month are kept as is.
    let start = Utc.with_ymd_and_hms(2000, 1, 15, 6, 0, 0).unwrap();
    let end: ValidityInterval = "P1M2DT3H".parse().unwrap();
    assert_eq!(end.add_to(start).unwrap(), Utc.with_ymd_and_hms(2000, 2, 17, 9, 0, 0).unwrap());
}

#[test]
fn date_text_forms_normalize_to_utc() {
    let noon = Utc.with_ymd_and_hms(2021, 5, 30, 12, 0, 0).unwrap();
    assert_eq!(parse_date_text("2021-05-30T12:00:00Z"), Some(noon));
    assert_eq!(parse_date_text("2021-05-30T14:00:00+02:00"), Some(noon));
    assert_eq!(parse_date_text("2021-05-30T12:00:00"), Some(noon));
    assert_eq!(parse_date_text("2021-05-30T12:00:00.000"), Some(noon));
    assert_eq!(
        parse_date_text("2021-05-30"),
        Some(Utc.with_ymd_and_hms(2021, 5, 30, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_date_text("30.05.2021"), None);
    assert_eq!(parse_date_text("2021-02-30"), None);
}

#[test]
fn partial_dates_parse_each_precision() {
    assert_eq!("".parse::<PartialDate>().unwrap(), PartialDate::Empty);
    assert_eq!("1964".parse::<PartialDate>().unwrap(), PartialDate::Year(1964));
    assert_eq!("1964-08".parse::<PartialDate>().unwrap(), PartialDate::YearMonth(1964, 8));
    assert_eq!("1964-08-12".parse::<PartialDate>().unwrap().to_string(), "1964-08-12");
    assert_eq!("1964-08-12T00:00:00".parse::<PartialDate>().unwrap().to_string(), "1964-08-12");
    assert_eq!(PartialDate::YearMonth(1964, 8).to_string(), "1964-08");

    for bad in ["64", "1964-13", "1964-8", "1964-02-30", "1964-08-12-01", "abcd"] {
        assert_eq!(bad.parse::<PartialDate>().unwrap_err().kind(), ErrorKind::Validation, "{bad:?}");
    }
}

#[test]
fn certificate_type_codes_are_bit_flags() {
    assert_eq!(CertificateType::Vaccination.code(), 1);
    assert_eq!(CertificateType::Recovery.code(), 2);
    assert_eq!(CertificateType::NaatTest.code(), 4);
    assert_eq!(CertificateType::RapidTest.code(), 8);
    for t in CertificateType::ALL {
        assert_eq!(CertificateType::from_code(t.code()), Some(t));
    }
    assert_eq!(CertificateType::from_code(3), None);
    assert_eq!(
        CertificateType::mask(&[CertificateType::NaatTest, CertificateType::RapidTest]),
        12
    );
}
