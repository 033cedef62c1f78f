// Copyright 2023-2026 The hyperdb-client authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Checked-in prost/tonic rendition of `proto/hyperdb.proto` (package
//! `hyperdb.v1`). Regenerate by hand when the proto changes; binary payload
//! fields are kept as [`bytes::Bytes`] so result frames stay slices of the
//! wire buffer.

#![allow(missing_docs, clippy::all)]

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TypedValue {
    /// Parameter name; only meaningful under `PARAM_STYLE_NAMED`.
    #[prost(string, tag = "6")]
    pub name: ::prost::alloc::string::String,
    #[prost(oneof = "typed_value::Value", tags = "1, 2, 3, 4, 5")]
    pub value: ::core::option::Option<typed_value::Value>,
}
/// Nested message and enum types in `TypedValue`.
pub mod typed_value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(bool, tag = "1")]
        BoolValue(bool),
        #[prost(int64, tag = "2")]
        Int64Value(i64),
        #[prost(double, tag = "3")]
        DoubleValue(f64),
        #[prost(string, tag = "4")]
        StringValue(::prost::alloc::string::String),
        #[prost(bytes = "vec", tag = "5")]
        BytesValue(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryParam {
    #[prost(string, tag = "1")]
    pub query: ::prost::alloc::string::String,
    #[prost(enumeration = "ParamStyle", tag = "2")]
    pub param_style: i32,
    #[prost(message, repeated, tag = "3")]
    pub parameters: ::prost::alloc::vec::Vec<TypedValue>,
    #[prost(enumeration = "TransferMode", tag = "4")]
    pub transfer_mode: i32,
    #[prost(enumeration = "OutputFormat", tag = "5")]
    pub output_format: i32,
    #[prost(map = "string, string", tag = "6")]
    pub settings: ::std::collections::HashMap<
        ::prost::alloc::string::String,
        ::prost::alloc::string::String,
    >,
    /// Soft bounds on the size of server responses; zero means server default.
    #[prost(uint64, tag = "7")]
    pub max_rows: u64,
    #[prost(uint64, tag = "8")]
    pub max_bytes: u64,
}
/// An opaque frame of Arrow IPC bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BinaryPart {
    #[prost(bytes = "bytes", tag = "1")]
    pub data: ::prost::bytes::Bytes,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorInfo {
    /// Five-character ISO SQL state.
    #[prost(string, tag = "1")]
    pub sqlstate: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub primary_message: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub hint: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub detail: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryStatus {
    #[prost(string, tag = "1")]
    pub query_id: ::prost::alloc::string::String,
    #[prost(enumeration = "CompletionStatus", tag = "2")]
    pub completion_status: i32,
    /// Both counters are monotonic non-decreasing for a given query id.
    #[prost(uint64, tag = "3")]
    pub chunk_count: u64,
    #[prost(uint64, tag = "4")]
    pub row_count: u64,
    #[prost(double, tag = "5")]
    pub progress: f64,
    /// Present when the query failed or was canceled server-side.
    #[prost(message, optional, tag = "6")]
    pub error: ::core::option::Option<ErrorInfo>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInfo {
    #[prost(oneof = "query_info::Content", tags = "1, 2")]
    pub content: ::core::option::Option<query_info::Content>,
}
/// Nested message and enum types in `QueryInfo`.
pub mod query_info {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Content {
        #[prost(message, tag = "1")]
        QueryStatus(super::QueryStatus),
        #[prost(message, tag = "2")]
        BinarySchema(super::BinaryPart),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInfoParam {
    #[prost(string, tag = "1")]
    pub query_id: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct RowRange {
    #[prost(uint64, tag = "1")]
    pub offset: u64,
    #[prost(uint64, tag = "2")]
    pub row_limit: u64,
    /// Bound on the byte size of this page; zero means server default.
    #[prost(uint64, tag = "3")]
    pub byte_limit: u64,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ChunkRange {
    #[prost(uint64, tag = "1")]
    pub chunk_id: u64,
    #[prost(uint64, tag = "2")]
    pub limit: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResultParam {
    #[prost(string, tag = "1")]
    pub query_id: ::prost::alloc::string::String,
    #[prost(bool, tag = "4")]
    pub omit_schema: bool,
    #[prost(oneof = "query_result_param::Range", tags = "2, 3")]
    pub range: ::core::option::Option<query_result_param::Range>,
}
/// Nested message and enum types in `QueryResultParam`.
pub mod query_result_param {
    #[derive(Clone, Copy, PartialEq, ::prost::Oneof)]
    pub enum Range {
        #[prost(message, tag = "2")]
        RowRange(super::RowRange),
        #[prost(message, tag = "3")]
        ChunkRange(super::ChunkRange),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResult {
    #[prost(oneof = "query_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<query_result::Result>,
}
/// Nested message and enum types in `QueryResult`.
pub mod query_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        QueryInfo(super::QueryInfo),
        #[prost(message, tag = "2")]
        BinaryPart(super::BinaryPart),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteQueryResponse {
    #[prost(oneof = "execute_query_response::Response", tags = "1, 2")]
    pub response: ::core::option::Option<execute_query_response::Response>,
}
/// Nested message and enum types in `ExecuteQueryResponse`.
pub mod execute_query_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Response {
        #[prost(message, tag = "1")]
        QueryInfo(super::QueryInfo),
        #[prost(message, tag = "2")]
        QueryResult(super::QueryResult),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelParam {
    #[prost(string, tag = "1")]
    pub query_id: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CancelQueryResponse {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ParamStyle {
    None = 0,
    Named = 1,
    Positional = 2,
}
impl ParamStyle {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::None => "PARAM_STYLE_NONE",
            Self::Named => "PARAM_STYLE_NAMED",
            Self::Positional => "PARAM_STYLE_POSITIONAL",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "PARAM_STYLE_NONE" => Some(Self::None),
            "PARAM_STYLE_NAMED" => Some(Self::Named),
            "PARAM_STYLE_POSITIONAL" => Some(Self::Positional),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TransferMode {
    Sync = 0,
    Async = 1,
    Adaptive = 2,
}
impl TransferMode {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Sync => "TRANSFER_MODE_SYNC",
            Self::Async => "TRANSFER_MODE_ASYNC",
            Self::Adaptive => "TRANSFER_MODE_ADAPTIVE",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "TRANSFER_MODE_SYNC" => Some(Self::Sync),
            "TRANSFER_MODE_ASYNC" => Some(Self::Async),
            "TRANSFER_MODE_ADAPTIVE" => Some(Self::Adaptive),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum OutputFormat {
    Unspecified = 0,
    ArrowIpc = 1,
}
impl OutputFormat {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "OUTPUT_FORMAT_UNSPECIFIED",
            Self::ArrowIpc => "OUTPUT_FORMAT_ARROW_IPC",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "OUTPUT_FORMAT_UNSPECIFIED" => Some(Self::Unspecified),
            "OUTPUT_FORMAT_ARROW_IPC" => Some(Self::ArrowIpc),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CompletionStatus {
    RunningOrUnspecified = 0,
    ResultsProduced = 1,
    Finished = 2,
}
impl CompletionStatus {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::RunningOrUnspecified => "COMPLETION_STATUS_RUNNING_OR_UNSPECIFIED",
            Self::ResultsProduced => "COMPLETION_STATUS_RESULTS_PRODUCED",
            Self::Finished => "COMPLETION_STATUS_FINISHED",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "COMPLETION_STATUS_RUNNING_OR_UNSPECIFIED" => Some(Self::RunningOrUnspecified),
            "COMPLETION_STATUS_RESULTS_PRODUCED" => Some(Self::ResultsProduced),
            "COMPLETION_STATUS_FINISHED" => Some(Self::Finished),
            _ => None,
        }
    }
}

/// Generated client implementations.
pub mod hyper_service_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::wildcard_imports)]
    use tonic::codegen::http::Uri;
    use tonic::codegen::*;
    #[derive(Debug, Clone)]
    pub struct HyperServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl HyperServiceClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> HyperServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> HyperServiceClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::BoxBody>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
            >>::Error: Into<StdError> + std::marker::Send + std::marker::Sync,
        {
            HyperServiceClient::new(InterceptedService::new(inner, interceptor))
        }
        /// Compress requests with the given encoding.
        ///
        /// This requires the server to support it otherwise it might respond with an
        /// error.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.send_compressed(encoding);
            self
        }
        /// Enable decompressing responses.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.accept_compressed(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }
        pub async fn execute_query(
            &mut self,
            request: impl tonic::IntoRequest<super::QueryParam>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::ExecuteQueryResponse>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    let e: StdError = e.into();
                    tonic::Status::unknown(format!("Service was not ready: {}", e))
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/hyperdb.v1.HyperService/ExecuteQuery",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("hyperdb.v1.HyperService", "ExecuteQuery"));
            self.inner.server_streaming(req, path, codec).await
        }
        pub async fn get_query_info(
            &mut self,
            request: impl tonic::IntoRequest<super::QueryInfoParam>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::QueryInfo>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    let e: StdError = e.into();
                    tonic::Status::unknown(format!("Service was not ready: {}", e))
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/hyperdb.v1.HyperService/GetQueryInfo",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("hyperdb.v1.HyperService", "GetQueryInfo"));
            self.inner.server_streaming(req, path, codec).await
        }
        pub async fn get_query_result(
            &mut self,
            request: impl tonic::IntoRequest<super::QueryResultParam>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::QueryResult>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    let e: StdError = e.into();
                    tonic::Status::unknown(format!("Service was not ready: {}", e))
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/hyperdb.v1.HyperService/GetQueryResult",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("hyperdb.v1.HyperService", "GetQueryResult"));
            self.inner.server_streaming(req, path, codec).await
        }
        pub async fn cancel_query(
            &mut self,
            request: impl tonic::IntoRequest<super::CancelParam>,
        ) -> std::result::Result<
            tonic::Response<super::CancelQueryResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    let e: StdError = e.into();
                    tonic::Status::unknown(format!("Service was not ready: {}", e))
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/hyperdb.v1.HyperService/CancelQuery",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("hyperdb.v1.HyperService", "CancelQuery"));
            self.inner.unary(req, path, codec).await
        }
    }
}

/// Generated server implementations.
pub mod hyper_service_server {
    #![allow(unused_variables, dead_code, missing_docs, clippy::wildcard_imports)]
    use tonic::codegen::*;
    /// Generated trait containing gRPC methods that should be implemented for use with HyperServiceServer.
    #[async_trait]
    pub trait HyperService: std::marker::Send + std::marker::Sync + 'static {
        /// Server streaming response type for the ExecuteQuery method.
        type ExecuteQueryStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<super::ExecuteQueryResponse, tonic::Status>,
            >
            + std::marker::Send
            + 'static;
        async fn execute_query(
            &self,
            request: tonic::Request<super::QueryParam>,
        ) -> std::result::Result<tonic::Response<Self::ExecuteQueryStream>, tonic::Status>;
        /// Server streaming response type for the GetQueryInfo method.
        type GetQueryInfoStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<super::QueryInfo, tonic::Status>,
            >
            + std::marker::Send
            + 'static;
        async fn get_query_info(
            &self,
            request: tonic::Request<super::QueryInfoParam>,
        ) -> std::result::Result<tonic::Response<Self::GetQueryInfoStream>, tonic::Status>;
        /// Server streaming response type for the GetQueryResult method.
        type GetQueryResultStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<super::QueryResult, tonic::Status>,
            >
            + std::marker::Send
            + 'static;
        async fn get_query_result(
            &self,
            request: tonic::Request<super::QueryResultParam>,
        ) -> std::result::Result<
            tonic::Response<Self::GetQueryResultStream>,
            tonic::Status,
        >;
        async fn cancel_query(
            &self,
            request: tonic::Request<super::CancelParam>,
        ) -> std::result::Result<tonic::Response<super::CancelQueryResponse>, tonic::Status>;
    }
    #[derive(Debug)]
    pub struct HyperServiceServer<T> {
        inner: Arc<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
        max_decoding_message_size: Option<usize>,
        max_encoding_message_size: Option<usize>,
    }
    impl<T> HyperServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
                max_decoding_message_size: None,
                max_encoding_message_size: None,
            }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
        /// Enable decompressing requests with the given encoding.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.accept_compression_encodings.enable(encoding);
            self
        }
        /// Compress responses with the given encoding, if the client supports it.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.send_compression_encodings.enable(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.max_decoding_message_size = Some(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.max_encoding_message_size = Some(limit);
            self
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for HyperServiceServer<T>
    where
        T: HyperService,
        B: Body + std::marker::Send + 'static,
        B::Error: Into<StdError> + std::marker::Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/hyperdb.v1.HyperService/ExecuteQuery" => {
                    #[allow(non_camel_case_types)]
                    struct ExecuteQuerySvc<T: HyperService>(pub Arc<T>);
                    impl<T: HyperService>
                        tonic::server::ServerStreamingService<super::QueryParam>
                        for ExecuteQuerySvc<T>
                    {
                        type Response = super::ExecuteQueryResponse;
                        type ResponseStream = T::ExecuteQueryStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::QueryParam>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as HyperService>::execute_query(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = ExecuteQuerySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/hyperdb.v1.HyperService/GetQueryInfo" => {
                    #[allow(non_camel_case_types)]
                    struct GetQueryInfoSvc<T: HyperService>(pub Arc<T>);
                    impl<T: HyperService>
                        tonic::server::ServerStreamingService<super::QueryInfoParam>
                        for GetQueryInfoSvc<T>
                    {
                        type Response = super::QueryInfo;
                        type ResponseStream = T::GetQueryInfoStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::QueryInfoParam>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as HyperService>::get_query_info(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = GetQueryInfoSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/hyperdb.v1.HyperService/GetQueryResult" => {
                    #[allow(non_camel_case_types)]
                    struct GetQueryResultSvc<T: HyperService>(pub Arc<T>);
                    impl<T: HyperService>
                        tonic::server::ServerStreamingService<super::QueryResultParam>
                        for GetQueryResultSvc<T>
                    {
                        type Response = super::QueryResult;
                        type ResponseStream = T::GetQueryResultStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::QueryResultParam>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as HyperService>::get_query_result(&inner, request)
                                    .await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = GetQueryResultSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/hyperdb.v1.HyperService/CancelQuery" => {
                    #[allow(non_camel_case_types)]
                    struct CancelQuerySvc<T: HyperService>(pub Arc<T>);
                    impl<T: HyperService> tonic::server::UnaryService<super::CancelParam>
                        for CancelQuerySvc<T>
                    {
                        type Response = super::CancelQueryResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::CancelParam>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as HyperService>::cancel_query(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = CancelQuerySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => {
                    Box::pin(async move {
                        Ok(
                            http::Response::builder()
                                .status(200)
                                .header("grpc-status", "12")
                                .header("content-type", "application/grpc")
                                .body(empty_body())
                                .unwrap(),
                        )
                    })
                }
            }
        }
    }
    impl<T> Clone for HyperServiceServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
                max_decoding_message_size: self.max_decoding_message_size,
                max_encoding_message_size: self.max_encoding_message_size,
            }
        }
    }
    /// Generated gRPC service name
    pub const SERVICE_NAME: &str = "hyperdb.v1.HyperService";
    impl<T> tonic::server::NamedService for HyperServiceServer<T> {
        const NAME: &'static str = SERVICE_NAME;
    }
}
