//! Core types for La Ruche d'Or.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod product;
pub mod promocode;
pub mod testimonial;

pub use id::*;
pub use order::{Order, OrderItem, OrderStatus, ParseOrderStatusError};
pub use product::{CATEGORIES, Product};
pub use promocode::{Discount, Promocode};
pub use testimonial::{Testimonial, TestimonialStatus};
