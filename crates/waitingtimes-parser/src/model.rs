use std::fmt;

/// One of the paired date/time column groups in a patient visit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPrefix {
    Arrival,
    Service,
    Departure,
}

impl EventPrefix {
    /// Derived columns are appended in this order.
    pub const ALL: [EventPrefix; 3] = [
        EventPrefix::Arrival,
        EventPrefix::Service,
        EventPrefix::Departure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventPrefix::Arrival => "ARRIVAL",
            EventPrefix::Service => "SERVICE",
            EventPrefix::Departure => "DEPARTURE",
        }
    }

    pub fn date_column(&self) -> &'static str {
        match self {
            EventPrefix::Arrival => "ARRIVAL_DATE",
            EventPrefix::Service => "SERVICE_DATE",
            EventPrefix::Departure => "DEPARTURE_DATE",
        }
    }

    pub fn time_column(&self) -> &'static str {
        match self {
            EventPrefix::Arrival => "ARRIVAL_TIME",
            EventPrefix::Service => "SERVICE_TIME",
            EventPrefix::Departure => "DEPARTURE_TIME",
        }
    }

    pub fn datetime_column(&self) -> &'static str {
        match self {
            EventPrefix::Arrival => "ARRIVAL_DATETIME",
            EventPrefix::Service => "SERVICE_DATETIME",
            EventPrefix::Departure => "DEPARTURE_DATETIME",
        }
    }
}

impl fmt::Display for EventPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
