/// Record identifier as read from the manifest (uniqueness is not enforced).
/// Examples: `12345`, `cat_001.jpg`
pub type RecordId = String;
/// Raw label string as read from the manifest.
/// Examples: `cat`, `Pushing [something] from left to right`
pub type Label = String;
/// Dense, 0-based label index assigned in sorted label order.
pub type LabelIdx = usize;
/// Path strings carried in record metadata.
/// Example: `images/cats/cat_001.jpg`
pub type PathString = String;
