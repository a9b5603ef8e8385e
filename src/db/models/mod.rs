//! Row models, enumerations and request/response DTOs

pub mod audit;
pub mod category;
pub mod dining_table;
pub mod order;
pub mod product;
pub mod user;

pub use audit::{AuditAction, AuditEntity, AuditEntry, AuditQuery, ChainReport};
pub use category::Category;
pub use dining_table::{DiningTable, TableStatus};
pub use order::{
    ItemCreate, ItemStatusUpdate, ItemUpdate, KitchenStatus, Order, OrderCreate, OrderItem,
    OrderQuery, OrderStatus, OrderStatusUpdate, OrderWithItems, kitchen_progress,
};
pub use product::{Product, ProductQuery};
pub use user::{AccountStatus, LoginRequest, LoginResponse, RegisterRequest, User, UserCreate, UserRole};
