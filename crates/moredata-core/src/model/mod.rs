pub mod field;
pub mod record;
pub mod schema;
pub mod value;

pub use field::{Collection, Field, FieldValue, Ordered, Sortable, Textual};
pub use record::{Fetchable, Record};
pub use schema::{EntitySchema, FieldDef, FieldType};
pub use value::Value;
