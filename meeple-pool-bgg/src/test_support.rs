//! Scripted transport and XML fixtures shared by the crate's tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use crate::settings::ClientSettings;
use crate::transport::{HttpResponse, Transport, TransportError};

pub const TEST_BASE_URL: &str = "http://bgg.test/xmlapi2";

pub fn test_settings() -> ClientSettings {
    ClientSettings {
        base_url: TEST_BASE_URL.to_string(),
        ..ClientSettings::default()
    }
}

/// One request seen by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub at: Instant,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Vec<RecordedRequest>,
}

/// Replays queued responses per endpoint (`collection`, `thing`) and records
/// every request. An endpoint with nothing queued answers `200 <items/>`.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, endpoint: &str, response: Result<HttpResponse, TransportError>) {
        self.script
            .lock()
            .unwrap()
            .responses
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_ok(&self, endpoint: &str, body: impl Into<String>) {
        self.push(endpoint, Ok(HttpResponse::new(200, body)));
    }

    pub fn push_status(&self, endpoint: &str, status: u16, times: usize) {
        for _ in 0..times {
            self.push(endpoint, Ok(HttpResponse::new(status, "")));
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<HttpResponse, TransportError> {
        let endpoint = url.rsplit('/').next().unwrap_or(url).to_string();
        let mut script = self.script.lock().unwrap();
        script.requests.push(RecordedRequest {
            url: url.to_string(),
            endpoint: endpoint.clone(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            at: Instant::now(),
        });
        script
            .responses
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "<items/>")))
    }
}

/// A collection document. Each entry is `(object id, name, overall rank)`.
pub fn collection_xml(items: &[(&str, &str, Option<&str>)]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push_str(&format!(r#"<items totalitems="{}">"#, items.len()));
    for (id, name, rank) in items {
        let rank = rank.unwrap_or("Not Ranked");
        xml.push_str(&format!(
            r#"<item objecttype="thing" objectid="{id}" subtype="boardgame" collid="1">
<name sortindex="1">{name}</name>
<yearpublished>1995</yearpublished>
<stats minplayers="3" maxplayers="4" minplaytime="60" maxplaytime="120" playingtime="120" numowned="1000">
<rating value="N/A"><average value="7.1"/>
<ranks><rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="{rank}" bayesaverage="7.0"/></ranks>
</rating>
</stats>
<status own="1" prevowned="0" fortrade="0" want="0" wanttoplay="0" wanttobuy="0" wishlist="0" preordered="0" lastmodified="2024-01-01 00:00:00"/>
<numplays>0</numplays>
</item>"#
        ));
    }
    xml.push_str("</items>");
    xml
}

/// A thing document. Each entry is `(id, primary name, average weight)`.
pub fn thing_xml(items: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">"#);
    for (id, name, weight) in items {
        xml.push_str(&format!(
            r#"<item type="boardgame" id="{id}">
<thumbnail>https://cf.geekdo-images.com/{id}_t.jpg</thumbnail>
<image>https://cf.geekdo-images.com/{id}.jpg</image>
<name type="primary" sortindex="1" value="{name}"/>
<name type="alternate" sortindex="1" value="{name} (alt)"/>
<description>A game.</description>
<yearpublished value="1995"/>
<minplayers value="3"/>
<maxplayers value="4"/>
<playingtime value="120"/>
<minplaytime value="60"/>
<maxplaytime value="120"/>
<minage value="10"/>
<statistics page="1"><ratings>
<usersrated value="100"/>
<average value="7.2"/>
<ranks><rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="Not Ranked" bayesaverage="Not Ranked"/></ranks>
<owned value="2000"/>
<numweights value="50"/>
<averageweight value="{weight}"/>
</ratings></statistics>
</item>"#
        ));
    }
    xml.push_str("</items>");
    xml
}
