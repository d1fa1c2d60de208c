use crate::error::Result;
use crate::ir::{EntityKind, Namespace, PropertySchema};

use super::{PageContext, PageStrategy};

/// Properties are documented by their description alone.
pub struct PropertyPage<'a>(pub &'a PropertySchema);

impl PageStrategy for PropertyPage<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::Property
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn title(&self, ns: &Namespace) -> String {
        format!("{}.{}", ns.name, self.0.name)
    }

    fn description(&self) -> Option<&str> {
        self.0.description.as_deref().or(self.0.schema.description.as_deref())
    }

    fn body(&self, _cx: &PageContext<'_>, _out: &mut String) -> Result<()> {
        Ok(())
    }
}
