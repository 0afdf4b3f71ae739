//! Domain models for the cake shop.
//!
//! Stored records ([`User`], [`Order`], [`Layer`]) never leave the process
//! as-is. Handlers respond with the projections defined next to them
//! (`UserListing`, `UserProfile`, `OrderView`, ...), which is where the
//! decision about what a client may see lives.

pub mod layer;
pub mod order;
pub mod session;
pub mod user;
pub mod validation;

pub use layer::{Ingredient, Layer, NewLayer};
pub use order::{
    CakeDetails, ClassicCake, CustomCake, IngredientSelection, NewOrder, Order, OrderFields,
    OrderSchema, OrderView, OwnerRef,
};
pub use session::{CurrentUser, SessionGrant};
pub use user::{
    NewUser, PasswordDigest, SignupFields, User, UserListing, UserProfile, UserSummary,
};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};
