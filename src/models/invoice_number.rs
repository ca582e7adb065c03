use chrono::{Duration, NaiveDateTime, Timelike};

const NUMBER_FORMAT: &str = "%Y%m%d%H%M";

/// Issues `INV-YYYYMMDDHHMM` numbers that never repeat within a session.
///
/// Numbers carry minute resolution, so when two are requested within the
/// same minute (or the clock goes backwards) the previous minute is bumped.
#[derive(Debug, Clone, Default)]
pub struct InvoiceNumberGenerator {
    last_issued: Option<NaiveDateTime>,
}

impl InvoiceNumberGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, now: NaiveDateTime) -> String {
        let minute = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);

        let issued = match self.last_issued {
            Some(last) if minute <= last => last + Duration::minutes(1),
            _ => minute,
        };

        self.last_issued = Some(issued);
        format!("INV-{}", issued.format(NUMBER_FORMAT))
    }
}
