pub mod bus;
pub mod liquid;
pub mod logging;
pub mod swap;

pub mod proto {
    pub mod v1 {
        tonic::include_proto!("liquid_swap.v1");
    }
}
