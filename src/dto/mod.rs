pub mod auto_dto;
pub mod venta_dto;

pub use auto_dto::{AutoCreate, AutoResponse, AutoUpdate, AutoWithVentasResponse, ListAutosQuery};
pub use venta_dto::{
    ListVentasQuery, VentaCreate, VentaResponse, VentaUpdate, VentaWithAutoResponse,
};
