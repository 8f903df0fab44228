//! Service groups module - investment product lines, their share value and services.

mod service_groups_model;
mod service_groups_service;
mod service_groups_traits;


pub use service_groups_model::{NewServiceGroup, ServiceGroup, ServiceGroupUpdate};
pub use service_groups_service::ServiceGroupService;
pub use service_groups_traits::{ServiceGroupRepositoryTrait, ServiceGroupServiceTrait};
