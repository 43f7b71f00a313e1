pub mod binding_event;
