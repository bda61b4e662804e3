use chrono::NaiveDateTime;
use rand::Rng;

use crate::domain::clock::Clock;
use crate::domain::id::StackName;

const TIMESTAMP_FORMAT: &str = "%m%d%y-%H%M%S";
const OWNER_SEPARATOR: char = ',';

/// `<owner>-<owner without commas>-<MMDDYY-HHMMSS>`.
///
/// Two calls by the same owner within the same second produce the same name.
pub fn derive_stack_name(owner: &str, now: NaiveDateTime) -> StackName {
    let compact_owner = owner.replace(OWNER_SEPARATOR, "");
    StackName::new(format!("{}-{}-{}", owner, compact_owner, now.format(TIMESTAMP_FORMAT)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NamingPolicy {
    pub unique_suffix: bool,
}

impl NamingPolicy {
    pub fn new(unique_suffix: bool) -> Self {
        Self { unique_suffix }
    }

    pub fn stack_name(&self, owner: &str, clock: &dyn Clock) -> StackName {
        let name = derive_stack_name(owner, clock.now());
        if !self.unique_suffix {
            return name;
        }

        let suffix: u16 = rand::rng().random();
        StackName::new(format!("{}-{:04x}", name, suffix))
    }
}
