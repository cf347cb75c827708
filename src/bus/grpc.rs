use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::bus::BusError;
use crate::bus::router::ProtocolRouter;
use crate::liquid::exec::ToolGateway;
use crate::proto::v1 as pb;
use crate::swap::ErrorKind;

/// Request/reply adapter exposing the router over gRPC.
pub struct SwapBusService<G> {
    router: Arc<ProtocolRouter<G>>,
}

impl<G: ToolGateway + 'static> SwapBusService<G> {
    pub fn new(router: Arc<ProtocolRouter<G>>) -> Self {
        Self { router }
    }

    pub fn into_server(self) -> pb::swap_bus_server::SwapBusServer<Self> {
        pb::swap_bus_server::SwapBusServer::new(self)
    }
}

fn status_from_bus_error(err: BusError) -> Status {
    match err {
        BusError::NoResponder(subject) => Status::not_found(format!("no responder: {subject}")),
        BusError::Internal => Status::internal(ErrorKind::InternalError.as_str()),
    }
}

#[tonic::async_trait]
impl<G: ToolGateway + 'static> pb::swap_bus_server::SwapBus for SwapBusService<G> {
    async fn request(
        &self,
        request: Request<pb::BusRequest>,
    ) -> Result<Response<pb::BusReply>, Status> {
        let req = request.into_inner();
        if req.subject.trim().is_empty() {
            return Err(Status::invalid_argument("subject is required"));
        }

        let data = self
            .router
            .dispatch(&req.subject, &req.data)
            .await
            .map_err(status_from_bus_error)?;

        Ok(Response::new(pb::BusReply {
            subject: req.subject,
            data,
        }))
    }
}
