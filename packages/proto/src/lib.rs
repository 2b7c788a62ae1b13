//! Generated protobuf/gRPC types for the account authentication surface.

pub mod account {
    pub mod v1 {
        tonic::include_proto!("aegis.account.v1");
    }
}
