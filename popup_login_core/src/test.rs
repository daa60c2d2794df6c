proptest::prop_compose! {
    /// A message that doesn't already start with an "Error:" label and has no
    /// markup or entities in it.
    pub fn plain_message()(message in "[A-Za-z0-9][A-Za-z0-9 .,!?']{0,40}") -> String {
        message
    }
}

proptest::prop_compose! {
    /// A message that already carries its own "Error:" label, in any case.
    pub fn labelled_message()(
        label in "(?i)error:",
        rest in "[A-Za-z0-9 .,!?']{0,40}",
    ) -> String {
        format!("{label}{rest}")
    }
}
