// Output document port
use crate::domain::error::Result;
use crate::domain::figure::Figure;
use std::path::Path;

pub trait DocumentWriter: Send + Sync {
    /// Write every figure as one page, in order, replacing whatever is at `path`
    fn write(&self, figures: &[Figure], path: &Path) -> Result<()>;
}
