//! Publish policy attached to a new channel.

use serde_json::{Value, json};

/// Policy document granting a bucket publish rights on a channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PublishPolicy(Value);

impl PublishPolicy {
    /// Allow the S3 service to publish, restricted to events from `bucket`.
    pub fn from_bucket(bucket: &str) -> Self {
        Self(json!({
            "Statement": {
                "Sid": "publish-from-s3",
                "Effect": "Allow",
                "Resource": "arn:aws:sns:*:*:*",
                "Principal": {"Service": "s3.amazonaws.com"},
                "Action": "SNS:Publish",
                "Condition": {"ArnLike": {"aws:SourceArn": format!("arn:aws:s3:*:*:{bucket}")}},
            }
        }))
    }

    /// The policy as a JSON document string.
    pub fn to_document(&self) -> String {
        self.0.to_string()
    }

    /// The bucket ARN publishing is restricted to.
    pub fn source_arn(&self) -> Option<&str> {
        self.0["Statement"]["Condition"]["ArnLike"]["aws:SourceArn"].as_str()
    }
}
