#![allow(dead_code)]

pub mod wsdl_server;
