//! Ordered, key-addressable property collections.
//!
//! A [`PropertyList`] holds members of one declared kind (anything that
//! implements [`PropertyKind`]): headers, query parameters, or generic
//! [`Property`] records. Members round-trip through [`PropertyDescriptor`],
//! the plain-data form, which keeps unknown fields verbatim.
//!
//! # Example
//!
//! ```rust
//! use apimodel::collection::{Property, PropertyDescriptor, PropertyList};
//!
//! let mut list: PropertyList<Property> = PropertyList::new();
//! list.add(Property::new("a", "1"));
//! list.add(Property::new("b", "2"));
//! list.upsert(Some(PropertyDescriptor::new("a", "10"))).unwrap();
//!
//! assert_eq!(list.count(), 2);
//! assert_eq!(list.index_of("a"), Some(0));
//! ```

pub mod property;
pub mod propertylist;

pub use property::{Property, PropertyDescriptor, PropertyKind};
pub use propertylist::{ListInput, ObjectOptions, PropertyList, UpsertOutcome};
