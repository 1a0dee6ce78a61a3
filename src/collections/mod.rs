mod typed_usize;
pub use typed_usize::TypedUsize;

mod vecmap;
pub use vecmap::{VecMap, VecMapIter};
