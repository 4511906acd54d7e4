/// Bootstrap DDL. `memories` is written by the ingestion pipeline and only
/// read here; `search_jobs` is the TTL-bounded job store.
pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS memories (
	memory_id uuid PRIMARY KEY,
	org_id text,
	user_id text,
	content_type text NOT NULL DEFAULT 'page',
	title text,
	url text,
	document_name text,
	page_number integer,
	text text NOT NULL,
	created_at timestamptz NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS memories_org_id_idx ON memories (org_id);
CREATE INDEX IF NOT EXISTS memories_user_id_idx ON memories (user_id);
CREATE TABLE IF NOT EXISTS search_jobs (
	job_id uuid PRIMARY KEY,
	status text NOT NULL DEFAULT 'pending',
	answer text,
	citations jsonb,
	results jsonb,
	created_at timestamptz NOT NULL,
	expires_at timestamptz NOT NULL
);
CREATE INDEX IF NOT EXISTS search_jobs_expires_at_idx ON search_jobs (expires_at)";
