use crate::Pilot;

/// A pilot with the standard helpers installed.
pub fn pilot() -> Pilot {
    let pilot = Pilot::new(concat!(module_path!(), " fixture"));
    pilot.inject_standard_helpers();
    pilot
}

/// Pass/fail flags of the current record's judgments, in order.
pub fn verdicts(pilot: &Pilot) -> Vec<bool> {
    pilot
        .current()
        .unwrap()
        .judgments()
        .iter()
        .map(|judgment| judgment.passed)
        .collect()
}

/// Run `$body` under `$id`, described by its source location.
macro_rules! run {
    ($pilot:expr, $id:expr => $body:expr) => {
        $pilot
            .run($id, || $body, concat!(file!(), ":", line!()))
            .unwrap()
    };
}

pub(crate) use run;
