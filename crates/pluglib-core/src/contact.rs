//! Contacts: DMR call targets and DTMF numbers.

use crate::types::CallType;

/// A contact list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Display name.
    pub name: String,
    /// Ring/alert tone when this contact calls in.
    pub ring: bool,
    /// DMR or DTMF specifics.
    pub kind: ContactKind,
}

/// The two contact flavors this family of radios stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactKind {
    /// A DMR call target.
    Dmr {
        /// Group, private, or all call.
        call_type: CallType,
        /// Talk group or subscriber number.
        number: u32,
    },
    /// A DTMF dial sequence.
    Dtmf {
        /// ASCII number string (digits, `*`, `#`, `A`-`D`).
        number: String,
    },
}

impl Contact {
    /// Create a DMR contact.
    pub fn dmr(name: impl Into<String>, call_type: CallType, number: u32) -> Self {
        Contact {
            name: name.into(),
            ring: false,
            kind: ContactKind::Dmr { call_type, number },
        }
    }

    /// Create a DTMF contact.
    pub fn dtmf(name: impl Into<String>, number: impl Into<String>) -> Self {
        Contact {
            name: name.into(),
            ring: false,
            kind: ContactKind::Dtmf {
                number: number.into(),
            },
        }
    }

    /// Whether this is a DMR contact.
    pub fn is_dmr(&self) -> bool {
        matches!(self.kind, ContactKind::Dmr { .. })
    }

    /// Whether this is a DTMF contact.
    pub fn is_dtmf(&self) -> bool {
        matches!(self.kind, ContactKind::Dtmf { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dmr_contact() {
        let c = Contact::dmr("Regional", CallType::Group, 8);
        assert!(c.is_dmr());
        assert!(!c.is_dtmf());
        assert_eq!(
            c.kind,
            ContactKind::Dmr {
                call_type: CallType::Group,
                number: 8
            }
        );
    }

    #[test]
    fn dtmf_contact() {
        let c = Contact::dtmf("Echolink", "*123#");
        assert!(c.is_dtmf());
        match c.kind {
            ContactKind::Dtmf { ref number } => assert_eq!(number, "*123#"),
            _ => panic!("expected DTMF"),
        }
    }
}
