pub mod cast_order;
