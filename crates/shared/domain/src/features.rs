use crate::constants::{AUDIT_LOGS, CERTIFICATE_MANAGEMENT, DIGITAL_SIGNATURES};
use bitflags::bitflags;

bitflags! {
    /// Product capabilities this build knows how to gate.
    ///
    /// Licenses and configuration carry features as free-form labels; a set is
    /// only a view over the labels it recognizes. Keep the labels themselves when
    /// persisting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FeatureSet: u32 {
        const DIGITAL_SIGNATURES = 1 << 0;
        const CERTIFICATE_MANAGEMENT = 1 << 1;
        const AUDIT_LOGS = 1 << 2;

        const ALL = Self::DIGITAL_SIGNATURES.bits()
            | Self::CERTIFICATE_MANAGEMENT.bits()
            | Self::AUDIT_LOGS.bits();
    }
}

const KNOWN: [(FeatureSet, &str); 3] = [
    (FeatureSet::DIGITAL_SIGNATURES, DIGITAL_SIGNATURES),
    (FeatureSet::CERTIFICATE_MANAGEMENT, CERTIFICATE_MANAGEMENT),
    (FeatureSet::AUDIT_LOGS, AUDIT_LOGS),
];

impl FeatureSet {
    /// Human-readable labels of the enabled features, in declaration order.
    #[must_use]
    pub fn labels(self) -> Vec<&'static str> {
        KNOWN.into_iter().filter(|(flag, _)| self.contains(*flag)).map(|(_, label)| label).collect()
    }

    /// The flag for one label; `*` and `all` select everything. `None` if unrecognized.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "all" | "*" => Some(Self::ALL),
            trimmed => KNOWN.into_iter().find(|(_, known)| *known == trimmed).map(|(flag, _)| flag),
        }
    }

    /// Union of the recognized labels. See [`FeatureSet::unknown_labels`] for the rest.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .filter_map(|label| Self::from_label(label.as_ref()))
            .fold(Self::empty(), |set, flag| set | flag)
    }

    /// Labels that [`FeatureSet::from_labels`] would leave out.
    pub fn unknown_labels(labels: &[String]) -> impl Iterator<Item = &str> {
        labels.iter().map(String::as_str).filter(|label| Self::from_label(label).is_none())
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::empty()
    }
}
